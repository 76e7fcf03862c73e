// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job spec construction for disk image conversion.
//!
//! Each job is a single-pod, run-to-completion batch Job with two stages:
//!
//! - `download` (init container) fetches the disk image into the shared
//!   `saveplace` volume at `/save/disk.img`.
//! - `buildandpush` (main container) wraps the disk image into a container
//!   image and pushes it to the registry. It runs privileged and gets its own
//!   `varlibcontainers` volume for container storage.
//!
//! The stages only share the scratch volume. Everything the build script
//! needs arrives through environment variables (`URL`, `TAG`, `INSECURE`).

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, EnvVar, PodSpec, PodTemplateSpec, SecurityContext, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::label::OwnerLabel;
use crate::name::JobName;
use crate::request::JobRequest;

/// Init container name.
pub const DOWNLOAD_CONTAINER: &str = "download";
/// Build container name.
pub const BUILD_CONTAINER: &str = "buildandpush";

/// Scratch volume shared by both stages.
pub const SAVE_VOLUME: &str = "saveplace";
pub const SAVE_MOUNT_PATH: &str = "/save";
/// Where the init stage leaves the fetched disk image.
pub const DISK_IMAGE_PATH: &str = "/save/disk.img";

/// Container storage for the nested image build.
pub const CONTAINERS_VOLUME: &str = "varlibcontainers";
pub const CONTAINERS_MOUNT_PATH: &str = "/var/lib/containers";

/// Entrypoint inside the build image.
pub const BUILD_ENTRYPOINT: &str = "/buildandpush.sh";

pub const ENV_URL: &str = "URL";
pub const ENV_TAG: &str = "TAG";
pub const ENV_INSECURE: &str = "INSECURE";

/// Build the batch Job for a request.
///
/// The source URL never appears in command text: the init container's
/// arguments reference it as `$(URL)`, which the kubelet expands from the
/// container environment without a shell.
pub fn build_job(name: &JobName, request: &JobRequest, label: &OwnerLabel) -> Job {
    let download = Container {
        name: DOWNLOAD_CONTAINER.to_string(),
        image: Some(request.images.download_image.clone()),
        command: Some(download_command()),
        env: Some(vec![env_var(ENV_URL, &request.source_url)]),
        volume_mounts: Some(vec![mount(SAVE_VOLUME, SAVE_MOUNT_PATH)]),
        ..Default::default()
    };

    // TAG must stay the first entry; the registry scanner reads it back by position.
    let build = Container {
        name: BUILD_CONTAINER.to_string(),
        image: Some(request.images.build_image.clone()),
        command: Some(vec!["sh".to_string(), "-c".to_string(), BUILD_ENTRYPOINT.to_string()]),
        env: Some(vec![
            env_var(ENV_TAG, &request.destination_tag),
            env_var(ENV_INSECURE, "true"),
        ]),
        volume_mounts: Some(vec![
            mount(SAVE_VOLUME, SAVE_MOUNT_PATH),
            mount(CONTAINERS_VOLUME, CONTAINERS_MOUNT_PATH),
        ]),
        security_context: Some(SecurityContext { privileged: Some(true), ..Default::default() }),
        ..Default::default()
    };

    let volumes = vec![scratch_volume(CONTAINERS_VOLUME), scratch_volume(SAVE_VOLUME)];

    Job {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(request.namespace.clone()),
            labels: Some(label.to_labels()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(label.to_labels()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    init_containers: Some(vec![download]),
                    containers: vec![build],
                    volumes: Some(volumes),
                    restart_policy: Some("Never".to_string()),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

/// `wget -O /save/disk.img $(URL)` as an argument vector.
fn download_command() -> Vec<String> {
    vec![
        "wget".to_string(),
        "-O".to_string(),
        DISK_IMAGE_PATH.to_string(),
        format!("$({})", ENV_URL),
    ]
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar { name: name.to_string(), value: Some(value.to_string()), ..Default::default() }
}

fn mount(volume: &str, path: &str) -> VolumeMount {
    VolumeMount { name: volume.to_string(), mount_path: path.to_string(), ..Default::default() }
}

fn scratch_volume(name: &str) -> Volume {
    Volume {
        name: name.to_string(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
