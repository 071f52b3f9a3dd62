// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::{fs, path::Path};

use entlite::{Config, Error, FieldType, Method, Pipeline, load_entities};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

const USER: &str = r#"
use entlite::{Annotation, Field};
use crate::logic;

/// Registered account.
pub struct User(entlite::Schema);

impl User {
    fn annotations(&self) -> Vec<Annotation> {
        vec![entlite::message(), entlite::service()]
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            entlite::string("email").unique().proto_field(2),
            entlite::string("name").validate(logic::starts_with_capital),
            entlite::int32("age").optional(),
            entlite::time("created_at").default_func(logic::now),
        ]
    }
}
"#;

const UPSTREAM: &str = r#"
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
}

pub struct Queries {
    pool: sqlx::PgPool,
}

impl Queries {
    pub async fn create_user(&self, arg: CreateUserParams) -> Result<User, sqlx::Error> {
        todo!()
    }
}
"#;

const CONFIG: &str = r#"
schema_dir = "schema"

[proto]
output = "gen/app.proto"
package = "app.v1"

[sql]
dialect = "postgres"
schema_output = "gen/schema.sql"
queries_output = "gen/query.sql"

[convert]
output = "gen/convert.rs"
db_module = "crate::db"
wire_module = "crate::pb"

[wrap]
input_dir = "upstream"
output_dir = "gen/store"
upstream_module = "crate::db"

[validate]
output = "gen/validate.rs"
wire_module = "crate::pb"
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn workspace(user: &str) -> TempDir {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema");
    fs::create_dir_all(schema.join("nested")).unwrap();
    fs::write(schema.join("user.rs"), user).unwrap();
    fs::write(schema.join("broken.rs"), "pub struct (((").unwrap();
    fs::write(
        schema.join("nested/odd.rs"),
        "#[entlite(table = 5)]\npub struct Odd(entlite::Schema);"
    )
    .unwrap();

    let upstream = dir.path().join("upstream");
    fs::create_dir_all(&upstream).unwrap();
    fs::write(upstream.join("queries.rs"), UPSTREAM).unwrap();

    fs::write(dir.path().join("entlite.toml"), CONFIG).unwrap();
    dir
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

#[test]
fn user_model_skips_malformed_declarations() {
    let dir = workspace(USER);
    let entities = load_entities(dir.path().join("schema")).unwrap();

    assert_eq!(entities.len(), 1);
    let user = &entities[0];
    assert_eq!(user.name, "User");
    assert_eq!(user.doc.as_deref(), Some("Registered account."));

    let tags: Vec<(&str, u32)> = user
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.tag.unwrap_or_default()))
        .collect();
    assert_eq!(
        tags,
        vec![("id", 1), ("email", 2), ("name", 3), ("age", 4), ("created_at", 5)]
    );
    assert_eq!(user.fields[0].ty, FieldType::Int32);
    assert_eq!(user.methods().len(), Method::ALL.len());
}

#[test]
fn full_run_writes_every_artifact() {
    let dir = workspace(USER);
    let config = Config::from_file(dir.path().join("entlite.toml")).unwrap();
    let written = Pipeline::new(&config).run().unwrap();
    assert_eq!(written.len(), 6);

    let root = dir.path();

    let proto = read(root, "gen/app.proto");
    assert!(proto.contains("package app.v1;"));
    assert!(proto.contains(
        "// Registered account.\nmessage User {\n  int32 id = 1;\n  string email = 2;\n  string name = 3;\n  \
         optional int32 age = 4;\n  google.protobuf.Timestamp created_at = 5;\n}"
    ));
    for method in ["Create", "Get", "Update", "Delete", "List"] {
        assert!(proto.contains(&format!("message {method}UserRequest {{")));
        assert!(proto.contains(&format!("rpc {method}({method}UserRequest)")));
    }
    assert!(proto.contains("message ListUserResponse {\n  repeated User users = 1;\n}"));

    let schema = read(root, "gen/schema.sql");
    assert!(schema.contains(
        "CREATE TABLE \"user\" (\n    id SERIAL PRIMARY KEY,\n    email TEXT UNIQUE NOT NULL,\n    \
         name TEXT NOT NULL,\n    age INTEGER,\n    created_at TIMESTAMP WITH TIME ZONE NOT NULL\n);"
    ));
    assert!(!schema.contains("Odd"));

    let queries = read(root, "gen/query.sql");
    assert!(queries.contains("-- name: CreateUser :one"));
    assert!(queries.contains("-- name: ListUsers :many"));
    assert!(queries.contains("-- name: DeleteUser :exec"));

    let convert = read(root, "gen/convert.rs");
    assert!(syn::parse_file(&convert).is_ok());
    assert!(convert.contains("pub fn user_db_to_wire(row: crate::db::User) -> crate::pb::User"));
    assert!(convert.contains("email: row.email"));

    let store = read(root, "gen/store/queries.rs");
    assert!(syn::parse_file(&store).is_ok());
    assert!(store.contains("use crate::logic;"));
    assert!(store.contains("created_at: logic::now()"));
    assert!(store.contains("if !logic::starts_with_capital(&arg.name)"));
    let params = &store[store.find("pub struct CreateUserParams").unwrap()..];
    let params = &params[..params.find('}').unwrap()];
    assert!(!params.contains("created_at"));
    assert!(params.contains("pub email: String"));

    let validate = read(root, "gen/validate.rs");
    assert!(syn::parse_file(&validate).is_ok());
    assert!(validate.contains("impl crate::pb::CreateUserRequest"));
    assert!(validate.contains("impl crate::pb::UpdateUserRequest"));
}

#[test]
fn tag_collision_aborts_without_writing() {
    let colliding = USER.replace(
        "entlite::int32(\"age\").optional()",
        "entlite::int32(\"age\").optional().proto_field(2)"
    );
    let dir = workspace(&colliding);
    let config = Config::from_file(dir.path().join("entlite.toml")).unwrap();

    let err = Pipeline::new(&config).run().unwrap_err();
    match err {
        Error::TagCollision {
            entity,
            tag,
            first,
            second
        } => {
            assert_eq!(entity, "User");
            assert_eq!(tag, 2);
            assert_eq!(first, "email");
            assert_eq!(second, "age");
        }
        other => panic!("unexpected error: {other}")
    }
    assert!(!dir.path().join("gen").exists());
}

#[test]
fn generator_failure_aborts_without_writing() {
    let dir = workspace(USER);
    let config = Config::from_file(dir.path().join("entlite.toml")).unwrap();
    fs::write(dir.path().join("upstream/queries.rs"), "pub struct (").unwrap();

    let err = Pipeline::new(&config).run().unwrap_err();
    assert!(matches!(err, Error::UpstreamParse { .. }));
    assert!(!dir.path().join("gen").exists());
}

#[test]
fn no_entities_found() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plain.rs"), "pub struct Plain;").unwrap();
    let err = load_entities(dir.path()).unwrap_err();
    assert!(matches!(err, Error::NoEntitiesFound { .. }));
}
