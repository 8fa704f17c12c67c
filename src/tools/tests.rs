use super::*;
use serde_json::json;
use std::time::Instant;

fn registry_in(dir: &Path) -> ToolRegistry {
    ToolRegistry::with_builtins(dir.to_path_buf(), Duration::from_secs(5))
}

#[tokio::test]
async fn test_registry_with_builtins() {
    let registry = ToolRegistry::with_builtins(PathBuf::from("."), Duration::from_secs(30));
    assert_eq!(registry.len(), 4);
    assert!(!registry.is_empty());
    assert_eq!(
        registry.names(),
        vec!["read_file", "write_file", "run_command", "list_files"]
    );
}

#[tokio::test]
async fn test_definitions_match_schema_table() {
    let registry = ToolRegistry::with_builtins(PathBuf::from("."), Duration::from_secs(30));
    let defs = registry.definitions();

    let required = |name: &str| -> Vec<String> {
        let def = defs.iter().find(|d| d.name == name).unwrap();
        def.parameters["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(required("read_file"), vec!["path"]);
    assert_eq!(required("write_file"), vec!["path", "content"]);
    assert_eq!(required("run_command"), vec!["command"]);
    assert!(required("list_files").is_empty());

    let list = defs.iter().find(|d| d.name == "list_files").unwrap();
    assert_eq!(list.parameters["properties"]["directory"]["type"], "string");
    assert!(defs.iter().all(|d| !d.description.is_empty()));
}

#[tokio::test]
async fn test_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());

    let result = registry
        .execute("write_file", json!({"path": "hello.txt", "content": "hello world"}))
        .await;
    assert!(!result.is_error);
    assert!(result.content.contains("Successfully"));
    assert!(result.content.contains("11 bytes"));

    let result = registry
        .execute("read_file", json!({"path": "hello.txt"}))
        .await;
    assert!(!result.is_error);
    assert_eq!(result.content, "hello world");
}

#[tokio::test]
async fn test_write_file_creates_parents() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let target = dir.path().join("a/b/c/deep.txt");

    let result = registry
        .execute(
            "write_file",
            json!({"path": target.to_str().unwrap(), "content": "nested"}),
        )
        .await;
    assert!(!result.is_error, "{}", result.content);

    let result = registry
        .execute("read_file", json!({"path": target.to_str().unwrap()}))
        .await;
    assert_eq!(result.content, "nested");
}

#[tokio::test]
async fn test_read_file_nonexistent() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("read_file", json!({"path": "nonexistent_file_xyz.txt"}))
        .await;
    assert!(result.is_error);
    assert_eq!(result.content, "Error: file 'nonexistent_file_xyz.txt' not found");
}

#[tokio::test]
async fn test_read_file_binary() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("blob.bin"), [0u8, 159, 146, 150]).unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("read_file", json!({"path": "blob.bin"}))
        .await;
    assert!(result.is_error);
    assert!(result.content.contains("binary"));
}

#[tokio::test]
async fn test_run_command_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("run_command", json!({"command": "echo hello"}))
        .await;
    assert!(!result.is_error);
    assert_eq!(result.content, "hello\n");
}

#[tokio::test]
async fn test_run_command_stderr_separate() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("run_command", json!({"command": "echo out; echo err >&2"}))
        .await;
    assert!(!result.is_error);
    assert_eq!(result.content, "out\n\nSTDERR:\nerr\n");
}

#[tokio::test]
async fn test_run_command_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("run_command", json!({"command": "exit 3"}))
        .await;
    assert!(result.is_error);
    assert!(result.content.ends_with("Exit code: 3"));
}

#[tokio::test]
async fn test_run_command_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry.execute("run_command", json!({"command": "true"})).await;
    assert_eq!(result.content, "(no output)");
}

#[tokio::test]
async fn test_run_command_runs_in_workdir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "").unwrap();
    let registry = registry_in(dir.path());
    let result = registry.execute("run_command", json!({"command": "ls"})).await;
    assert!(result.content.contains("marker.txt"));
}

#[tokio::test]
async fn test_run_command_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ToolRegistry::with_builtins(dir.path().to_path_buf(), Duration::from_secs(1));

    let started = Instant::now();
    let result = registry
        .execute("run_command", json!({"command": "sleep 30"}))
        .await;
    let elapsed = started.elapsed();

    assert!(result.is_error);
    assert!(result.content.contains("timed out"));
    assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_list_files_sorted_with_dir_suffix() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.txt"), "").unwrap();
    std::fs::write(dir.path().join("a.txt"), "").unwrap();
    std::fs::create_dir(dir.path().join("mydir")).unwrap();
    let registry = registry_in(dir.path());

    let result = registry.execute("list_files", json!({})).await;
    assert!(!result.is_error);
    let expected = format!("a.txt\nb.txt\nmydir{}", std::path::MAIN_SEPARATOR);
    assert_eq!(result.content, expected);
}

#[tokio::test]
async fn test_list_files_empty() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("list_files", json!({"directory": dir.path().to_str().unwrap()}))
        .await;
    assert!(!result.is_error);
    assert_eq!(result.content, "(empty directory)");
}

#[tokio::test]
async fn test_list_files_nonexistent() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("list_files", json!({"directory": "no_such_dir"}))
        .await;
    assert!(result.is_error);
    assert!(result.content.starts_with("Error"));
}

#[tokio::test]
async fn test_unknown_tool() {
    let registry = ToolRegistry::with_builtins(PathBuf::from("."), Duration::from_secs(30));
    let result = registry.execute("nonexistent_tool", json!({})).await;
    assert!(result.is_error);
    assert_eq!(result.content, "Error: unknown tool 'nonexistent_tool'");
}

#[tokio::test]
async fn test_missing_required_field() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_in(dir.path());
    let result = registry
        .execute("write_file", json!({"path": "x.txt"}))
        .await;
    assert!(result.is_error);
    assert!(result.content.contains("missing required field 'content'"));
    assert!(!dir.path().join("x.txt").exists());
}

#[tokio::test]
async fn test_wrong_field_type() {
    let registry = ToolRegistry::with_builtins(PathBuf::from("."), Duration::from_secs(30));
    let result = registry
        .execute("run_command", json!({"command": 42}))
        .await;
    assert!(result.is_error);
    assert!(result.content.contains("must be a string"));

    let result = registry.execute("read_file", json!("Cargo.toml")).await;
    assert!(result.is_error);
    assert!(result.content.contains("expected a JSON object"));
}

#[test]
fn test_validate_input_allows_unknown_fields() {
    let schema = json!({
        "type": "object",
        "properties": {"path": {"type": "string"}},
        "required": ["path"]
    });
    assert_eq!(
        validate_input("read_file", &schema, &json!({"path": "a", "extra": 1})),
        Ok(())
    );
    assert_eq!(
        validate_input("read_file", &schema, &json!({})),
        Err(ToolError::InvalidInput {
            tool: "read_file".into(),
            reason: "missing required field 'path'".into(),
        })
    );
}
