//! End-to-end tests: `redcover serve` replaying a cassette, driven by
//! `redcover generate`. Zero provider I/O.

use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;

/// PNG signature, base64-encoded as a provider would return it.
const PNG_B64: &str = "iVBORw0KGgo=";
const PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Kills the server when the test ends, pass or fail.
struct Server {
    child: Child,
    url: String,
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

fn write_cassette(name: &str, outputs: &[&str]) -> PathBuf {
    let mut yaml = format!(
        "name: {name}\nrecorded_at: \"2026-02-01T00:00:00Z\"\ncommit: test\ninteractions:\n"
    );
    for (seq, output) in outputs.iter().enumerate() {
        yaml.push_str(&format!(
            "  - seq: {seq}\n    port: image_generator\n    method: generate\n    output:\n{output}"
        ));
    }
    let path = std::env::temp_dir().join(format!("redcover_{name}.cassette.yaml"));
    std::fs::write(&path, yaml).unwrap();
    path
}

fn ok_image() -> String {
    format!("      Ok:\n        images:\n          - data: {PNG_B64}\n            mime_type: image/png\n")
}

fn start_server(cassette: &Path) -> Server {
    let addr = free_addr();
    let child = std::process::Command::new(env!("CARGO_BIN_EXE_redcover"))
        .args(["serve", "--bind", &addr])
        .env("REDCOVER_REPLAY", cassette)
        .env("REDCOVER_CONFIG", "/nonexistent/redcover/config.toml")
        .env_remove("GEMINI_API_KEY")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let server = Server { child, url: format!("http://{addr}") };

    let deadline = Instant::now() + Duration::from_secs(10);
    while TcpStream::connect(&addr).is_err() {
        assert!(Instant::now() < deadline, "server did not start on {addr}");
        std::thread::sleep(Duration::from_millis(50));
    }
    server
}

fn generate(server: &Server) -> Command {
    let mut cmd = Command::cargo_bin("redcover").unwrap();
    cmd.env("REDCOVER_CONFIG", "/nonexistent/redcover/config.toml")
        .args(["generate", "--server", &server.url]);
    cmd
}

#[test]
fn generated_cover_is_saved_to_disk() {
    let cassette = write_cassette("e2e_happy", &[&ok_image()]);
    let server = start_server(&cassette);
    let out = std::env::temp_dir().join("redcover_e2e_happy.png");
    let _ = std::fs::remove_file(&out);

    generate(&server)
        .args(["--output", out.to_str().unwrap(), "金色祥云"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    assert_eq!(std::fs::read(&out).unwrap(), PNG_BYTES);
    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn avatar_mode_round_trip() {
    let cassette = write_cassette("e2e_avatar", &[&ok_image()]);
    let server = start_server(&cassette);
    let out = std::env::temp_dir().join("redcover_e2e_avatar.png");
    let _ = std::fs::remove_file(&out);

    generate(&server)
        .args(["--mode", "avatar", "--style", "cartoon", "--pose", "bust"])
        .args(["--output", out.to_str().unwrap(), "可爱的卡通龙宝宝"])
        .assert()
        .success();

    assert!(out.exists(), "avatar output should have been written");
    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn count_saves_numbered_files_and_lists_history() {
    let cassette = write_cassette("e2e_count", &[&ok_image(), &ok_image()]);
    let server = start_server(&cassette);
    let out = std::env::temp_dir().join("redcover_e2e_count.png");
    let numbered: Vec<PathBuf> = (1..=2)
        .map(|n| std::env::temp_dir().join(format!("redcover_e2e_count-{n}.png")))
        .collect();
    for path in &numbered {
        let _ = std::fs::remove_file(path);
    }

    generate(&server)
        .args(["--count", "2", "--output", out.to_str().unwrap(), "红色灯笼"])
        .assert()
        .success()
        .stderr(predicate::str::contains("History:"))
        .stderr(predicate::str::contains("Just now"));

    for path in &numbered {
        assert_eq!(std::fs::read(path).unwrap(), PNG_BYTES);
        let _ = std::fs::remove_file(path);
    }
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn failures_surface_server_messages() {
    let cassette = write_cassette(
        "e2e_failures",
        &["      Ok:\n        images: []\n", "      Err: \"API error (429): quota exceeded\"\n"],
    );
    let server = start_server(&cassette);

    // Validation happens before the provider, so no cassette entry is used.
    generate(&server)
        .arg("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt is required"));

    generate(&server)
        .arg("金色鲤鱼跃龙门")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No image generated"));

    generate(&server)
        .arg("红色灯笼与烟花")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quota exceeded"));

    let _ = std::fs::remove_file(&cassette);
}
