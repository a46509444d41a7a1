use assert_cmd::Command;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::TempDir;

const HEADER: &str = "person_age,person_income,person_emp_exp,person_home_ownership,loan_amnt,loan_int_rate,loan_intent,credit_score,cb_person_cred_hist_length,previous_loan_defaults_on_file";

/// Отвечает один раз заданным статусом и телом, возвращает base_url.
fn serve_once(status: u16, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut payload = vec![0u8; content_length];
        reader.read_exact(&mut payload).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
    });
    format!("http://{addr}")
}

fn creditpath() -> Command {
    Command::cargo_bin("creditpath").unwrap()
}

fn stderr_of(cmd: &mut Command) -> String {
    let out = cmd.output().unwrap();
    assert!(!out.status.success());
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn cli_help_smoke() {
    creditpath().arg("--help").assert().success();
}

#[test]
fn batch_without_file_is_rejected() {
    let err = stderr_of(creditpath().arg("batch"));
    assert!(err.contains("error: Please select a file to upload"), "{err}");
}

#[test]
fn batch_wrong_extension_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("borrowers.txt");
    std::fs::write(&path, format!("{HEADER}\n")).unwrap();
    let err = stderr_of(creditpath().arg("batch").arg("--input").arg(&path));
    assert!(err.contains("Please upload a .csv file"), "{err}");
}

#[test]
fn batch_missing_columns_fail_before_network() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("borrowers.csv");
    std::fs::write(&path, "person_age,person_income\n30,1\n").unwrap();
    // unreachable port: the command must fail on validation, not on the network
    let err = stderr_of(
        creditpath()
            .args(["--base-url", "http://127.0.0.1:9"])
            .arg("batch")
            .arg("--input")
            .arg(&path),
    );
    assert!(err.contains("Missing required columns: person_emp_exp"), "{err}");
}

#[test]
fn server_message_reaches_the_user() {
    let base = serve_once(500, r#"{"message": "model unavailable"}"#);
    let err = stderr_of(creditpath().args([
        "--base-url", base.as_str(), "predict",
        "-f", "age=30", "-f", "income=500000", "-f", "experience=5", "-f", "home_ownership=RENT",
        "-f", "loan_amount=150000", "-f", "interest_rate=10.5", "-f", "loan_purpose=EDUCATION",
        "-f", "credit_score=650", "-f", "credit_history=8", "-f", "previous_defaults=No",
    ]));
    assert_eq!(err.trim_end().lines().last().unwrap(), "error: model unavailable");
}

#[test]
fn batch_renders_and_exports() {
    let base = serve_once(
        200,
        r#"{"total_predictions": 1, "predictions": [{
            "default_probability": 0.82, "risk_level": "High Risk",
            "recommendation": {"action": "Prioritize collection efforts from borrower", "priority": "Urgent", "timeline": "Within 24-48 hours"},
            "borrower_summary": {"age": 30, "annual_income": 500000.0, "loan_amount": 150000.0, "credit_score": 650}
        }]}"#,
    );
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("borrowers.csv");
    let output = tmp.path().join("out.csv");
    std::fs::write(&input, format!("{HEADER}\n30,500000,5,RENT,150000,10.5,EDUCATION,650,8,No\n")).unwrap();

    let out = creditpath()
        .args(["--base-url", base.as_str(), "batch"])
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("High risk:           1"));

    let exported = std::fs::read_to_string(&output).unwrap();
    assert_eq!(exported.lines().count(), 2);
    assert!(exported.lines().nth(1).unwrap().starts_with("1,30,500000,150000,650,\"82.00%\",\"High Risk\""));
}
