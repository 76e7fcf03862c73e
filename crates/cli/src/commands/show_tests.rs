// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cdtool_adapters::{FakeJobStore, JobQuery, StoreCall};
use cdtool_core::test_support::job;
use cdtool_core::OwnerLabel;
use serial_test::serial;

fn scanner(store: &FakeJobStore) -> Scanner<FakeJobStore> {
    Scanner::new(store.clone(), OwnerLabel::default())
}

#[tokio::test]
#[serial]
async fn detail_table_shows_source_and_tag() {
    let store = FakeJobStore::new();
    store.insert(job("ns1", "cdtool-a", "http://x/y", "registry/img:v1"));
    let jobs = scanner(&store).detail("ns1", None).await.unwrap();

    std::env::set_var("NO_COLOR", "1");
    let mut out = Vec::new();
    render(&jobs, &mut out);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "NAME      SRC         TAG              SUCCEED  FINISH TIME\n\
         cdtool-a  http://x/y  registry/img:v1  false    n/a\n"
    );
}

#[tokio::test]
#[serial]
async fn defaults_to_configured_namespace() {
    std::env::set_var("CDTOOL_NAMESPACE", "build");
    let store = FakeJobStore::new();
    store.insert(job("build", "cdtool-a", "http://x/y", "t"));

    let args = ShowArgs { name: Some("cdtool-a".into()), namespace: None };
    handle(&scanner(&store), &args, OutputFormat::Json, &mut Vec::new()).await.unwrap();
    std::env::remove_var("CDTOOL_NAMESPACE");

    assert_eq!(
        store.calls(),
        vec![StoreCall::List(
            JobQuery::new(OwnerLabel::default()).in_namespace("build").named("cdtool-a")
        )]
    );
}

#[tokio::test]
async fn missing_named_job_is_an_error() {
    let store = FakeJobStore::new();
    let args = ShowArgs { name: Some("cdtool-gone".into()), namespace: Some("ns1".into()) };

    let err = handle(&scanner(&store), &args, OutputFormat::Text, &mut Vec::new()).await.unwrap_err();
    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, FAILURE);
    assert_eq!(exit.message, "job cdtool-gone not found in namespace ns1");
}
