//! End-to-end tests invoking the compiled `stagemake` binary.
#![cfg(unix)]

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use test_support::{ManifestBuilder, Workspace, fake_script};

fn stagemake(ws: &Workspace) -> Result<Command> {
    let mut cmd = Command::cargo_bin("stagemake").context("locate stagemake binary")?;
    cmd.current_dir(ws.root()).env_remove("STAGEMAKE_SHELL");
    Ok(cmd)
}

fn app_manifest() -> String {
    ManifestBuilder::default()
        .default_goal("all")
        .target("all", "true", "app.o")
        .target("app.o", "touch app.o", "app.c")
        .to_json()
}

#[test]
fn fresh_object_runs_only_goal_recipe() -> Result<()> {
    let ws = Workspace::new()?;
    ws.write_manifest(&app_manifest())?;
    ws.touch("app.c", 1)?;
    ws.touch("app.o", 2)?;
    let before = std::fs::metadata(ws.path("app.o"))?.modified()?;

    stagemake(&ws)?
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{2714} build succeeded"));

    let after = std::fs::metadata(ws.path("app.o"))?.modified()?;
    ensure!(before == after, "app.o should not have been rebuilt");
    Ok(())
}

#[test]
fn second_run_reports_nothing_to_do() -> Result<()> {
    let ws = Workspace::new()?;
    ws.write_manifest(
        &ManifestBuilder::default()
            .target("all", "touch all", "app.o")
            .target("app.o", "touch app.o", "app.c")
            .to_json(),
    )?;
    ws.touch("app.c", 1)?;

    stagemake(&ws)?.assert().success();
    stagemake(&ws)?
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to be done for all"));
    Ok(())
}

#[test]
fn plan_subcommand_prints_tree_without_running() -> Result<()> {
    let ws = Workspace::new()?;
    ws.write_manifest(&app_manifest())?;
    ws.touch("app.o", 1)?;
    ws.touch("app.c", 2)?;
    let before = std::fs::metadata(ws.path("app.o"))?.modified()?;

    stagemake(&ws)?
        .arg("plan")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\u{250c} stages:")
                .and(predicate::str::contains("build app.o (app.c is newer)"))
                .and(predicate::str::contains("sequence: app.o \u{279c} all")),
        );
    let after = std::fs::metadata(ws.path("app.o"))?.modified()?;
    ensure!(before == after, "plan must not execute recipes");
    Ok(())
}

#[test]
fn explicit_goal_overrides_default() -> Result<()> {
    let ws = Workspace::new()?;
    ws.write_manifest(
        &ManifestBuilder::default()
            .default_goal("all")
            .target("all", "echo all >> log", "")
            .target("docs", "echo docs >> log", "")
            .to_json(),
    )?;
    stagemake(&ws)?.args(["build", "docs"]).assert().success();
    ensure!(ws.read("log")? == "docs\n");
    Ok(())
}

#[test]
fn failing_recipe_stops_the_build() -> Result<()> {
    let ws = Workspace::new()?;
    let (_script_dir, script) = fake_script("fail", 1);
    let script = script.to_str().context("script path is UTF-8")?;
    ws.write_manifest(
        &ManifestBuilder::default()
            .target("all", "echo all >> ran.log", "lib")
            .target("lib", script, "gen")
            .target("gen", "echo gen >> ran.log", "")
            .to_json(),
    )?;

    stagemake(&ws)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("recipe for target 'lib' failed"));
    ensure!(ws.read("ran.log")? == "gen\nfail\n");
    Ok(())
}

#[test]
fn unresolved_prerequisite_fails_before_any_recipe() -> Result<()> {
    let ws = Workspace::new()?;
    ws.write_manifest(
        &ManifestBuilder::default()
            .target("all", "echo all >> log", "app.o")
            .target("app.o", "echo app.o >> log", "app.c")
            .to_json(),
    )?;
    stagemake(&ws)?
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No rule to make target 'app.c', needed by 'app.o'.",
        ));
    ensure!(!ws.path("log").exists(), "no recipe should run");
    Ok(())
}

#[test]
fn missing_manifest_is_reported() -> Result<()> {
    let ws = Workspace::new()?;
    stagemake(&ws)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("stagemake.json does not exist!"));
    Ok(())
}

#[test]
fn directory_flag_resolves_manifest_and_recipes() -> Result<()> {
    let ws = Workspace::new()?;
    ws.write(
        "project/build.yml",
        "targets:\n  all:\n    recipe: echo hi > out.txt\n",
    )?;
    stagemake(&ws)?
        .args(["-C", "project", "-f", "build.yml"])
        .assert()
        .success();
    ensure!(ws.read("project/out.txt")? == "hi\n");
    ensure!(!ws.path("out.txt").exists());
    Ok(())
}

#[test]
fn verbose_flag_logs_commands() -> Result<()> {
    let ws = Workspace::new()?;
    ws.write_manifest(
        &ManifestBuilder::default()
            .target("all", "echo --password=hunter2", "")
            .to_json(),
    )?;
    stagemake(&ws)?
        .arg("--verbose")
        .assert()
        .success()
        .stderr(
            predicate::str::contains("Running command:")
                .and(predicate::str::contains("hunter2").not()),
        );
    Ok(())
}
