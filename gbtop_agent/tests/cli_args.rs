//! CLI arg parsing tests for gbtop_agent (server)
use std::process::Command;
use std::time::Duration;

#[test]
fn test_help_mentions_options() {
    let out = Command::new(env!("CARGO_BIN_EXE_gbtop_agent"))
        .arg("--help")
        .output()
        .expect("run agent --help");
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(out.status.success());
    assert!(text.contains("--port") && text.contains("-p"), "{text}");
    assert!(text.contains("--disk-path"), "{text}");
}

#[test]
fn test_port_short_and_long() {
    // The process should start and keep running; kill it quickly.
    let exe = env!("CARGO_BIN_EXE_gbtop_agent");
    for args in [["--port", "9555"], ["-p", "9556"]] {
        let mut child = Command::new(exe).args(args).spawn().expect("spawn agent");
        std::thread::sleep(Duration::from_millis(150));
        assert!(
            child.try_wait().expect("poll agent").is_none(),
            "agent {args:?} exited early"
        );
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[test]
fn test_bad_port_rejected() {
    let out = Command::new(env!("CARGO_BIN_EXE_gbtop_agent"))
        .args(["--port", "not-a-port"])
        .output()
        .expect("run agent");
    assert!(!out.status.success());
}
