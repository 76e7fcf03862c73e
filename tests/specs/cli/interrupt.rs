// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ctrl-C while talking to a cluster that never answers.

use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// Start a server that accepts connections and never replies, and write a
/// kubeconfig pointing at it.
fn silent_cluster(dir: &std::path::Path) -> std::path::PathBuf {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for conn in listener.incoming() {
            held.push(conn);
        }
    });

    let path = dir.join("kubeconfig");
    let config = format!(
        "apiVersion: v1
kind: Config
clusters:
- name: silent
  cluster:
    server: http://{addr}
contexts:
- name: silent
  context:
    cluster: silent
    user: silent
current-context: silent
users:
- name: silent
  user:
    token: not-a-real-token
"
    );
    std::fs::write(&path, config).unwrap();
    path
}

fn wait_with_deadline(child: &mut Child, limit: Duration) -> Option<i32> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status.code();
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("cdtool still running {:?} after SIGINT", limit);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn sigint_stops_hung_list_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let kubeconfig = silent_cluster(dir.path());

    let mut child = Command::new(assert_cmd::cargo::cargo_bin("cdtool"))
        .args(["list-jobs", "--kubeconfig"])
        .arg(&kubeconfig)
        .env("NO_COLOR", "1")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Let it connect and block on the response
    std::thread::sleep(Duration::from_millis(500));
    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();

    assert_eq!(wait_with_deadline(&mut child, Duration::from_secs(10)), Some(130));
}
