use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const DECLARATIONS: &str = r#"{
    "classes": [
        {
            "name": "com.acme.Repo",
            "methods": [
                {
                    "name": "find",
                    "params": [{ "name": "key", "type": "Ljava/lang/String;" }],
                    "returns": "Ljava/lang/String;"
                },
                {
                    "name": "save",
                    "params": [
                        {
                            "name": "value",
                            "type": {
                                "signature": "Ljava/lang/String;",
                                "annotations": ["org.jetbrains.annotations.NotNull"]
                            }
                        }
                    ],
                    "returns": "V"
                }
            ]
        },
        {
            "name": "java.util.Map",
            "kind": "interface",
            "type_params": [{ "name": "K" }, { "name": "V" }],
            "methods": [
                {
                    "name": "putIfAbsent",
                    "params": [{ "type": "TK;" }, { "type": "TV;" }],
                    "returns": "TV;"
                },
                {
                    "name": "get",
                    "params": [{ "type": "Ljava/lang/Object;" }],
                    "returns": "TV;"
                }
            ]
        }
    ]
}"#;

fn javelin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("javelin"))
}

fn fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("decls.json").write_str(DECLARATIONS).unwrap();
    temp
}

#[test]
fn help_mentions_core_commands() {
    javelin().arg("--help").assert().success().stdout(
        predicate::str::contains("enhance")
            .and(predicate::str::contains("signatures"))
            .and(predicate::str::contains("schema")),
    );
}

#[test]
fn enhance_prints_resolved_signatures() {
    let temp = fixture();

    javelin()
        .arg("enhance")
        .arg(temp.child("decls.json").path())
        .arg("--class")
        .arg("com.acme.Repo")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("com.acme.Repo")
                .and(predicate::str::contains(
                    "find(key: java.lang.String?): java.lang.String!",
                ))
                .and(predicate::str::contains("save(value: java.lang.String): void")),
        );
}

#[test]
fn enhance_json_applies_predefined_corrections() {
    let temp = fixture();

    let output = javelin()
        .arg("enhance")
        .arg(temp.child("decls.json").path())
        .arg("--class")
        .arg("java.util.Map")
        .arg("--member")
        .arg("putIfAbsent")
        .arg("--json")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let members = v["classes"][0]["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    let function = &members[0]["kind"]["function"];
    assert_eq!(members[0]["predefined"], true);
    assert_eq!(function["return_type"]["nullability"], "nullable");
    assert_eq!(function["params"][0]["ty"]["nullability"], "not_null");
    assert_eq!(function["params"][0]["ty"]["source"], "predefined");
}

#[test]
fn enhance_honors_a_disabled_config() {
    let temp = fixture();
    temp.child("javelin.toml")
        .write_str("[enhancement]\nmode = \"disabled\"\n")
        .unwrap();

    javelin()
        .arg("enhance")
        .arg(temp.child("decls.json").path())
        .arg("--config")
        .arg(temp.child("javelin.toml").path())
        .arg("--member")
        .arg("save")
        .assert()
        .success()
        .stdout(predicate::str::contains("save(value: java.lang.String?): void"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = fixture();
    temp.child("javelin.toml")
        .write_str("[enhancement.jsr305_user]\n\"NotQualified\" = \"strict\"\n")
        .unwrap();

    javelin()
        .arg("enhance")
        .arg(temp.child("decls.json").path())
        .arg("--config")
        .arg(temp.child("javelin.toml").path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not a qualified annotation class name"));
}

#[test]
fn signatures_mark_predefined_methods() {
    let temp = fixture();

    javelin()
        .arg("signatures")
        .arg(temp.child("decls.json").path())
        .arg("--class")
        .arg("java.util.Map")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(
                "java/util/Map.putIfAbsent(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object; [predefined]",
            )
            .and(predicate::str::contains(
                "java/util/Map.get(Ljava/lang/Object;)Ljava/lang/Object;\n",
            )),
        );
}

#[test]
fn schema_describes_the_config() {
    let output = javelin().arg("schema").output().unwrap();
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(v["definitions"]["EnhancementConfig"].is_object(), "{v}");
}

#[test]
fn errors_exit_with_code_two() {
    let temp = TempDir::new().unwrap();

    javelin()
        .arg("enhance")
        .arg(temp.child("missing.json").path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load declarations"));

    let temp = fixture();
    javelin()
        .arg("signatures")
        .arg(temp.child("decls.json").path())
        .arg("--class")
        .arg("com.acme.Missing")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown class `com.acme.Missing`"));
}
