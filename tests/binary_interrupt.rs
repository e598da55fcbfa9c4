#![cfg(unix)]

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use tempfile::tempdir;

fn spawn(cfg_dir: &Path, args: &[&Path]) -> Child {
    let me = assert_cmd::cargo::cargo_bin!("client_fs");
    Command::new(me)
        .env("CLIENT_FS_CONFIG", cfg_dir.join("absent.xml"))
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn binary")
}

fn interrupt(child: &Child) {
    let rc = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGINT) };
    assert_eq!(rc, 0, "kill(SIGINT) failed");
}

/// Wait up to `limit` for the child; kill it and fail if it is still running.
fn wait_within(child: &mut Child, limit: Duration) -> ExitStatus {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if started.elapsed() > limit {
            let _ = child.kill();
            let _ = child.wait();
            panic!("binary ignored SIGINT for {limit:?}");
        }
        sleep(Duration::from_millis(50));
    }
}

#[test]
fn interrupt_ends_a_blocked_read() {
    let td = tempdir().unwrap();
    let fifo = td.path().join("never_written");
    let c_path = CString::new(fifo.as_os_str().as_bytes()).unwrap();
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0, "mkfifo failed");

    // Opening a FIFO for reading blocks until a writer shows up, which never happens.
    let mut child = spawn(td.path(), &[Path::new("cat"), &fifo]);
    sleep(Duration::from_secs(1));
    assert!(child.try_wait().unwrap().is_none(), "cat should still be blocked");

    interrupt(&child);
    let status = wait_within(&mut child, Duration::from_secs(5));
    assert_eq!(status.code(), Some(130));
}

#[test]
fn interrupt_releases_a_held_lock() {
    let td = tempdir().unwrap();
    let lock_path = td.path().join("client.lock");
    let mut child = spawn(td.path(), &[Path::new("lock"), &lock_path]);

    let started = Instant::now();
    while !lock_path.exists() {
        assert!(started.elapsed() < Duration::from_secs(10), "lock file never appeared");
        assert!(child.try_wait().unwrap().is_none(), "lock exited early");
        sleep(Duration::from_millis(20));
    }

    interrupt(&child);
    let status = wait_within(&mut child, Duration::from_secs(5));
    assert!(status.success(), "status: {status:?}");
    assert!(!lock_path.exists());
}
