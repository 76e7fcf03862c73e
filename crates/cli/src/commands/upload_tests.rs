// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cdtool_adapters::FakeJobStore;
use cdtool_core::{JobName, JobView, OwnerLabel};
use cdtool_engine::{PollConfig, Submitted};
use serial_test::serial;
use std::net::Ipv4Addr;

fn job_args() -> JobArgs {
    JobArgs { namespace: None, download_image: None, build_image: None, timeout: None }
}

fn report(outcome: Option<WaitOutcome>) -> UploadReport {
    UploadReport {
        submitted: Submitted {
            name: JobName::from_string("cdtool-260301-123005-bx7q"),
            namespace: "build".into(),
            source_url: "http://x/y".into(),
            tag: "t".into(),
        },
        outcome,
    }
}

fn exit_code(result: Result<()>) -> Option<i32> {
    result.err().map(|e| e.downcast_ref::<ExitError>().map_or(-1, |x| x.code))
}

#[yare::parameterized(
    seconds  = { "30s",   30 },
    minutes  = { "5m",    300 },
    mixed    = { "1h30m", 5400 },
    bare     = { "45",    45 },
    padded   = { " 2m ",  120 },
)]
fn parses_durations(input: &str, secs: u64) {
    assert_eq!(parse_duration(input).unwrap(), Duration::from_secs(secs));
}

#[yare::parameterized(
    empty   = { "" },
    zero    = { "0s" },
    unit    = { "5d" },
    no_num  = { "m" },
)]
fn rejects_bad_durations(input: &str) {
    assert!(parse_duration(input).is_err());
}

#[test]
fn outcomes_map_to_exit_codes() {
    let secs = Duration::from_secs(3);
    assert_eq!(exit_code(check_outcome(&report(None))), None);
    assert_eq!(
        exit_code(check_outcome(&report(Some(WaitOutcome::Succeeded { elapsed: secs, failed: 2 })))),
        None
    );
    assert_eq!(
        exit_code(check_outcome(&report(Some(WaitOutcome::Failed { elapsed: secs, failed: 6 })))),
        Some(FAILURE)
    );
    assert_eq!(
        exit_code(check_outcome(&report(Some(WaitOutcome::TimedOut { elapsed: secs })))),
        Some(TIMED_OUT)
    );
    assert_eq!(
        exit_code(check_outcome(&report(Some(WaitOutcome::Cancelled { elapsed: secs })))),
        Some(crate::exit_error::INTERRUPTED)
    );
}

#[test]
fn failed_job_message_names_the_job() {
    let outcome = WaitOutcome::Failed { elapsed: Duration::from_secs(65), failed: 6 };
    let err = check_outcome(&report(Some(outcome))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "job build/cdtool-260301-123005-bx7q failed after 1m05s (6 failed pods)"
    );
}

#[test]
#[serial]
fn local_args_combine_address_and_port() {
    std::env::remove_var("CDTOOL_NAMESPACE");
    let args = LocalArgs {
        file: PathBuf::from("./disk.img"),
        tag: "myreg/img:v1".into(),
        listen_addr: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)),
        listen_port: 9000,
        job: job_args(),
    };
    let upload = args.to_upload();
    assert_eq!(upload.listen, "10.0.0.5:9000".parse::<SocketAddr>().unwrap());
    assert_eq!(upload.namespace, "default");
    assert_eq!(upload.request("http://10.0.0.5:9000/disk.img").destination_tag, "myreg/img:v1");
}

#[test]
#[serial]
fn flags_override_environment_images() {
    std::env::set_var("CDTOOL_DOWNLOAD_IMAGE", "mirror.local/busybox:1");
    std::env::set_var("CDTOOL_BUILD_IMAGE", "mirror.local/cdtool:1");
    let args = RemoteArgs {
        url: "https://example.com/disk.img".into(),
        tag: "myreg/img:v1".into(),
        wait: false,
        job: JobArgs {
            namespace: Some("build".into()),
            build_image: Some("custom/cdtool:dev".into()),
            ..job_args()
        },
    };
    let request = args.to_request();
    std::env::remove_var("CDTOOL_DOWNLOAD_IMAGE");
    std::env::remove_var("CDTOOL_BUILD_IMAGE");

    assert_eq!(request.namespace, "build");
    assert_eq!(request.images.download_image, "mirror.local/busybox:1");
    assert_eq!(request.images.build_image, "custom/cdtool:dev");
}

#[tokio::test]
async fn remote_upload_without_wait_creates_job() {
    let store = FakeJobStore::new();
    let uploader = Uploader::new(store.clone(), OwnerLabel::default(), PollConfig::default());
    let request =
        JobRequest::new("https://example.com/disk.img", "myreg/img:v1").with_namespace("build");

    handle_remote(&uploader, &request, false, &CancellationToken::new(), OutputFormat::Json)
        .await
        .unwrap();

    let jobs = store.jobs();
    assert_eq!(jobs.len(), 1);
    let view = JobView::of(&jobs[0]);
    assert_eq!(view.namespace, "build");
    assert_eq!(view.source, "https://example.com/disk.img");
    assert_eq!(store.get_count(), 0);
}

#[tokio::test]
async fn cancelled_wait_exits_interrupted() {
    let store = FakeJobStore::new();
    let uploader = Uploader::new(store, OwnerLabel::default(), PollConfig::default());
    let request = JobRequest::new("http://x/y", "t");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = handle_remote(&uploader, &request, true, &cancel, OutputFormat::Json).await;
    assert_eq!(exit_code(result), Some(crate::exit_error::INTERRUPTED));
}
