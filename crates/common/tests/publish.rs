//! Integration tests for resource publishing.

mod helpers;

use std::fs;

use common::prelude::*;
use common::publish::obfuscate::sha1_hex;

use helpers::{setup_env, FailingPublisher, RecordingPublisher};

#[test]
fn anonymous_publish_creates_a_shared_mirror_entry() {
    let env = setup_env();
    let recorder = RecordingPublisher::default();
    let target = PublishingTarget::new(&env.config, Box::new(recorder.clone()));

    let resource = Resource::new("/userfiles/report.pdf");
    let ctx = RequestContext::anonymous("siteA");
    let address = target.publish_resource(&resource, &ctx).unwrap();

    let source = env.report_source();
    let dir_hash = sha1_hex(source.parent().unwrap().to_string_lossy().as_bytes());
    assert_eq!(address, format!("linkveil/siteA/0/{dir_hash}/report.pdf"));

    // the address resolves, through the link, to the source bytes
    let entry = env.docroot().join(&address);
    assert!(entry.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(fs::read(&entry).unwrap(), fs::read(&source).unwrap());

    // anonymous mirrors are shared and never protected
    assert_eq!(recorder.call_count(), 0);
}

#[test]
fn authenticated_publish_partitions_and_protects() {
    let env = setup_env();
    let recorder = RecordingPublisher::default();
    let target = PublishingTarget::new(&env.config, Box::new(recorder.clone()));

    let resource = Resource::new("userfiles/report.pdf");
    let anon = target
        .publish_resource(&resource, &RequestContext::anonymous("siteA"))
        .unwrap();
    let auth = target
        .publish_resource(&resource, &RequestContext::authenticated("siteA", "tok123"))
        .unwrap();

    assert_ne!(anon, auth);
    assert!(auth.contains("/258defc1a5878f0c1e01bd53aa4c0e98ef7ab43d/"));

    // protection was published on the entry's parent directory, and the
    // directory was still empty at that point (no reachability window)
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    let entry = env.docroot().join(&auth);
    assert_eq!(calls[0].0, entry.parent().unwrap());
    assert!(calls[0].1, "link existed before protection was published");
}

#[test]
fn distinct_tokens_get_distinct_mirror_subtrees() {
    let env = setup_env();
    let target = PublishingTarget::new(&env.config, Box::new(NoopPublisher));

    let resource = Resource::new("userfiles/report.pdf");
    let a = target
        .publish_resource(&resource, &RequestContext::authenticated("siteA", "tok123"))
        .unwrap();
    let b = target
        .publish_resource(&resource, &RequestContext::authenticated("siteA", "tok456"))
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn republishing_is_idempotent_and_skips_protection() {
    let env = setup_env();
    let recorder = RecordingPublisher::default();
    let target = PublishingTarget::new(&env.config, Box::new(recorder.clone()));

    let resource = Resource::new("userfiles/report.pdf");
    let ctx = RequestContext::authenticated("siteA", "tok123");

    let first = target.publish_resource(&resource, &ctx).unwrap();
    let second = target.publish_resource(&resource, &ctx).unwrap();

    assert_eq!(first, second);
    // the pre-existing entry short-circuits: no second protection call
    assert_eq!(recorder.call_count(), 1);
}

#[test]
fn missing_resource_is_not_found_and_writes_nothing() {
    let env = setup_env();
    let target = PublishingTarget::new(&env.config, Box::new(NoopPublisher));

    let err = target
        .publish_resource(
            &Resource::new("userfiles/missing.pdf"),
            &RequestContext::anonymous("siteA"),
        )
        .unwrap_err();

    assert!(err.is_not_found());
    // the lazy publishing root was never initialized
    assert!(!env.docroot().join("linkveil").exists());
}

#[test]
fn protection_failure_aborts_before_the_link_exists() {
    let env = setup_env();
    let target = PublishingTarget::new(&env.config, Box::new(FailingPublisher));

    let resource = Resource::new("userfiles/report.pdf");
    let ctx = RequestContext::authenticated("siteA", "tok123");
    let err = target.publish_resource(&resource, &ctx).unwrap_err();
    assert!(matches!(err, PublishError::Protection(_)));

    // no mirror entry anywhere under the publishing root
    let entries = walk_files(&env.docroot().join("linkveil"));
    assert!(entries.is_empty(), "unexpected entries: {entries:?}");
}

#[test]
fn explicit_publishing_root_is_honored() {
    let mut env = setup_env();
    env.config.publishing_root = Some(env.docroot().join("mirror"));
    let target = PublishingTarget::new(&env.config, Box::new(NoopPublisher));

    let address = target
        .publish_resource(
            &Resource::new("userfiles/report.pdf"),
            &RequestContext::anonymous("siteA"),
        )
        .unwrap();

    assert!(address.starts_with("mirror/siteA/0/"));
    assert!(env.docroot().join(&address).symlink_metadata().is_ok());
}

fn walk_files(root: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.push(path);
            }
        }
    }
    out
}
