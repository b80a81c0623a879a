// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! - `cargo xtask ci` runs lint, build, test, and migration parity.
//! - `cargo test` runs every standard test against in-memory `SQLite`.
//! - `cargo xtask test-mariadb` provisions a `MariaDB` container and runs the
//!   ignored backend validation tests in `matricula-persistence` against it.
//! - `cargo xtask verify-migrations` checks that `migrations/` (`SQLite`) and
//!   `migrations_mysql/` (`MySQL`) describe the same schema.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::{fs, io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::eyre, eyre::Context, Result};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const PERSISTENCE_PACKAGE: &str = "matricula-persistence";
const SQLITE_MIGRATIONS: &str = "crates/persistence/migrations";
const MYSQL_MIGRATIONS: &str = "crates/persistence/migrations_mysql";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migration parity)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check that docs build without errors
    #[command(visible_alias = "d")]
    LintDocs,

    /// Lint formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run all tests
    #[command(visible_alias = "t")]
    Test,

    /// Run the ignored backend tests against a throwaway `MariaDB` container
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify the `SQLite` and `MySQL` migrations describe the same schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migration parity)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint clippy, docs, and formatting
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors for every default package
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run lib and doc tests for the workspace's default packages
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run `MariaDB` backend validation tests
///
/// 1. Checks Docker is available
/// 2. Starts a `MariaDB` 11 container on port 3307
/// 3. Waits up to 30 seconds for it to accept connections
/// 4. Runs the ignored tests in `matricula-persistence` with
///    `DATABASE_URL` and `MATRICULA_TEST_BACKEND=mariadb`
/// 5. Stops and removes the container, even when the tests fail
fn test_mariadb() -> Result<()> {
    use std::thread::sleep;
    use std::time::Duration;

    tracing::info!("Starting MariaDB backend validation");

    cmd!("docker", "--version")
        .run_with_trace()
        .wrap_err("Docker is not available. Please install Docker.")?;

    let container = MariadbContainer {
        name: "matricula-test-mariadb",
        database: "matricula_test",
        user: "matricula",
        password: "test_password",
        port: "3307",
    };

    container.remove();
    container.start()?;

    tracing::info!("Waiting for MariaDB to be ready...");
    let max_attempts = 30;
    let ready = (1..=max_attempts).any(|attempt| {
        sleep(Duration::from_secs(1));
        tracing::debug!("Connection attempt {}/{}", attempt, max_attempts);
        container.ping()
    });

    if !ready {
        container.remove();
        return Err(eyre!("MariaDB did not become ready within timeout"));
    }

    tracing::info!("Running MariaDB backend validation tests");
    let test_result = cmd!(
        "cargo",
        "test",
        "--package",
        PERSISTENCE_PACKAGE,
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.url())
    .env("MATRICULA_TEST_BACKEND", "mariadb")
    .run_with_trace();

    container.remove();

    test_result.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// A throwaway `MariaDB` container.
struct MariadbContainer {
    name: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: &'static str,
}

impl MariadbContainer {
    fn start(&self) -> Result<()> {
        tracing::info!("Starting MariaDB container: {}", self.name);
        cmd!(
            "docker",
            "run",
            "--name",
            self.name,
            "-e",
            format!("MARIADB_DATABASE={}", self.database),
            "-e",
            format!("MARIADB_USER={}", self.user),
            "-e",
            format!("MARIADB_PASSWORD={}", self.password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", self.port),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;
        Ok(())
    }

    fn ping(&self) -> bool {
        cmd!(
            "docker",
            "exec",
            self.name,
            "mariadb",
            "-u",
            self.user,
            format!("-p{}", self.password),
            "-e",
            "SELECT 1"
        )
        .stdout_null()
        .stderr_null()
        .run()
        .is_ok()
    }

    /// Stops and removes the container, ignoring failures.
    fn remove(&self) {
        tracing::info!("Removing MariaDB container: {}", self.name);
        let _ = cmd!("docker", "stop", self.name)
            .stdout_null()
            .stderr_null()
            .run();
        let _ = cmd!("docker", "rm", self.name)
            .stdout_null()
            .stderr_null()
            .run();
    }

    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Both directories must contain the same migrations, each with `up.sql`
/// and `down.sql`. The `up.sql` scripts must create the same tables with
/// the same columns, unique columns, foreign keys, and indexes. Column
/// types are not compared; they legitimately differ between backends.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");

    let sqlite_dirs = migration_names(Path::new(SQLITE_MIGRATIONS))?;
    let mysql_dirs = migration_names(Path::new(MYSQL_MIGRATIONS))?;

    if sqlite_dirs != mysql_dirs {
        let only_sqlite: Vec<_> = sqlite_dirs.difference(&mysql_dirs).collect();
        let only_mysql: Vec<_> = mysql_dirs.difference(&sqlite_dirs).collect();
        return Err(eyre!(
            "Migration directories differ. Only in SQLite: {only_sqlite:?}. Only in MySQL: {only_mysql:?}"
        ));
    }

    let mut sqlite_schema = Schema::default();
    let mut mysql_schema = Schema::default();

    for name in &sqlite_dirs {
        for (root, schema) in [
            (SQLITE_MIGRATIONS, &mut sqlite_schema),
            (MYSQL_MIGRATIONS, &mut mysql_schema),
        ] {
            let dir: PathBuf = Path::new(root).join(name);
            if !dir.join("down.sql").is_file() {
                return Err(eyre!("{} is missing down.sql", dir.display()));
            }
            let up: String = fs::read_to_string(dir.join("up.sql"))
                .wrap_err_with(|| format!("failed to read {}/up.sql", dir.display()))?;
            schema.apply(&up);
        }
    }

    tracing::info!(
        "Parsed {} SQLite tables and {} MySQL tables",
        sqlite_schema.tables.len(),
        mysql_schema.tables.len()
    );

    compare_schemas(&sqlite_schema, &mysql_schema)?;

    tracing::info!("Schema parity verified across {} migrations", sqlite_dirs.len());
    Ok(())
}

fn migration_names(root: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(root).wrap_err_with(|| format!("failed to read {}", root.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
    /// Index name to `table(columns)`.
    indexes: BTreeMap<String, String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Table {
    columns: BTreeSet<String>,
    unique_columns: BTreeSet<String>,
    foreign_keys: BTreeSet<String>,
}

impl Schema {
    /// Folds one migration script into the schema.
    ///
    /// Understands the subset of DDL the migrations use: `CREATE TABLE`
    /// with one column or constraint per line, `CREATE [UNIQUE] INDEX`,
    /// and `DROP TABLE`.
    fn apply(&mut self, sql: &str) {
        let mut current: Option<(String, Table)> = None;

        for raw in sql.lines() {
            let line = raw.trim().trim_end_matches(',');
            if line.is_empty() || line.starts_with("--") {
                continue;
            }
            let upper = line.to_ascii_uppercase();

            if let Some((_, table)) = current.as_mut() {
                if line.starts_with(')') {
                    if let Some((name, table)) = current.take() {
                        self.tables.insert(name, table);
                    }
                } else if upper.starts_with("FOREIGN KEY") {
                    table.foreign_keys.insert(normalize(line));
                } else if upper.starts_with("UNIQUE") {
                    table.unique_columns.insert(normalize(line));
                } else if !["PRIMARY KEY", "CONSTRAINT", "CHECK", "KEY", "INDEX"]
                    .iter()
                    .any(|kw| upper.starts_with(kw))
                {
                    let column = first_word(line);
                    if upper.contains(" UNIQUE") {
                        table.unique_columns.insert(column.clone());
                    }
                    if let Some(at) = upper.find(" REFERENCES ") {
                        let target = &line[at + " REFERENCES ".len()..];
                        table.foreign_keys.insert(normalize(&format!(
                            "FOREIGN KEY ({column}) REFERENCES {target}"
                        )));
                    }
                    table.columns.insert(column);
                }
            } else if let Some(rest) = strip_keyword(line, "CREATE TABLE") {
                current = Some((first_word(rest), Table::default()));
            } else if let Some(rest) = strip_keyword(line, "CREATE UNIQUE INDEX")
                .or_else(|| strip_keyword(line, "CREATE INDEX"))
            {
                let index = first_word(rest);
                let target = rest
                    .split_once(" ON ")
                    .or_else(|| rest.split_once(" on "))
                    .map(|(_, target)| normalize(target.trim_end_matches(';')))
                    .unwrap_or_default();
                self.indexes.insert(index, target);
            } else if let Some(rest) = strip_keyword(line, "DROP TABLE IF EXISTS")
                .or_else(|| strip_keyword(line, "DROP TABLE"))
            {
                self.tables.remove(&first_word(rest));
            }
        }
    }
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    line.get(..keyword.len())
        .filter(|head| head.eq_ignore_ascii_case(keyword))
        .map(|_| line[keyword.len()..].trim_start())
}

fn first_word(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .trim_matches('`')
        .to_lowercase()
}

/// Lower-cases and strips whitespace and quoting so constraint text compares
/// across backends.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '`')
        .collect::<String>()
        .to_lowercase()
}

fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let mut problems: Vec<String> = Vec::new();

    let sqlite_tables: BTreeSet<&String> = sqlite.tables.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql.tables.keys().collect();
    for table in sqlite_tables.symmetric_difference(&mysql_tables) {
        problems.push(format!("table '{table}' exists in only one backend"));
    }

    for (name, sqlite_table) in &sqlite.tables {
        let Some(mysql_table) = mysql.tables.get(name) else {
            continue;
        };
        for (what, left, right) in [
            ("columns", &sqlite_table.columns, &mysql_table.columns),
            (
                "unique columns",
                &sqlite_table.unique_columns,
                &mysql_table.unique_columns,
            ),
            (
                "foreign keys",
                &sqlite_table.foreign_keys,
                &mysql_table.foreign_keys,
            ),
        ] {
            let diff: Vec<&String> = left.symmetric_difference(right).collect();
            if !diff.is_empty() {
                problems.push(format!("table '{name}' {what} differ: {diff:?}"));
            }
        }
    }

    if sqlite.indexes != mysql.indexes {
        problems.push(format!(
            "indexes differ: SQLite {:?}, MySQL {:?}",
            sqlite.indexes, mysql.indexes
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        for problem in &problems {
            tracing::error!("{problem}");
        }
        Err(eyre!("Schema parity check failed with {} problem(s)", problems.len()))
    }
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
