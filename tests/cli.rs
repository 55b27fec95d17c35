#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("roulement-cli").unwrap()
}

#[test]
fn help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("add-worker"))
                .and(predicate::str::contains("generate"))
                .and(predicate::str::contains("check")),
        );
}

#[test]
fn init_add_generate_flow() {
    let dir = tempdir().unwrap();
    let plan = dir.path().join("plan.json").display().to_string();
    let plan = plan.as_str();

    cli().args(["--plan", plan, "init"]).assert().success();
    // refus d'écraser sans --force
    cli().args(["--plan", plan, "init"]).assert().failure();

    cli()
        .args(["--plan", plan, "add-worker", "--id", "alice", "--name", "Alice"])
        .assert()
        .success();

    cli()
        .args(["--plan", plan, "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));

    let out_csv = dir.path().join("march.csv").display().to_string();
    cli()
        .args([
            "--plan",
            plan,
            "generate",
            "--month",
            "3",
            "--year",
            "2023",
            "--out-csv",
            out_csv.as_str(),
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2023-03-01:")
                .and(predicate::str::contains("alice"))
                .and(predicate::str::contains("(External)")),
        );

    let csv = std::fs::read_to_string(&out_csv).unwrap();
    assert!(csv.starts_with("date,08h-16h,16h-00h,00h-08h"));
    assert_eq!(csv.lines().count(), 32);
}

#[test]
fn generate_rejects_invalid_month() {
    let dir = tempdir().unwrap();
    let plan = dir.path().join("plan.json").display().to_string();
    let plan = plan.as_str();
    cli().args(["--plan", plan, "init"]).assert().success();

    cli()
        .args(["--plan", plan, "generate", "--month", "13", "--year", "2023"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month/year"));
}
