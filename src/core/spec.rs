use crate::core::network::DockerNetwork;
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use testcontainers::core::{AccessMode, IntoContainerPort, Mount};
use testcontainers::{ContainerRequest, CopyDataSource, GenericImage, ImageExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    pub source: PathBuf,
    pub target: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCopy {
    pub source: PathBuf,
    pub target: String,
}

/// Everything needed to create one container, before it touches Docker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub image: String,
    pub tag: String,
    pub hostname: String,
    pub exposed_port: Option<u16>,
    pub env: BTreeMap<String, String>,
    pub mounts: Vec<BindMount>,
    pub copies: Vec<FileCopy>,
    pub entrypoint: Option<String>,
    pub cmd: Vec<String>,
}

impl ContainerSpec {
    pub fn new(image: &str, tag: &str, hostname: &str) -> Self {
        Self {
            image: image.to_string(),
            tag: tag.to_string(),
            hostname: hostname.to_string(),
            exposed_port: None,
            env: BTreeMap::new(),
            mounts: Vec::new(),
            copies: Vec::new(),
            entrypoint: None,
            cmd: Vec::new(),
        }
    }

    pub fn with_exposed_port(mut self, port: u16) -> Self {
        self.exposed_port = Some(port);
        self
    }

    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(env.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Relative sources are resolved against the current working directory.
    pub fn with_read_only_mount(mut self, source: impl AsRef<Path>, target: &str) -> Result<Self> {
        self.mounts.push(BindMount {
            source: absolute(source.as_ref())?,
            target: target.to_string(),
            read_only: true,
        });
        Ok(self)
    }

    pub fn with_copy(mut self, source: impl AsRef<Path>, target: &str) -> Self {
        self.copies.push(FileCopy {
            source: source.as_ref().to_path_buf(),
            target: target.to_string(),
        });
        self
    }

    pub fn with_entrypoint<I, S>(mut self, entrypoint: &str, cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoint = Some(entrypoint.to_string());
        self.cmd = cmd.into_iter().map(Into::into).collect();
        self
    }

    pub fn image_reference(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    pub fn into_request(self, network: &DockerNetwork) -> ContainerRequest<GenericImage> {
        let mut image = GenericImage::new(self.image, self.tag);
        if let Some(port) = self.exposed_port {
            image = image.with_exposed_port(port.tcp());
        }
        if let Some(entrypoint) = &self.entrypoint {
            image = image.with_entrypoint(entrypoint);
        }

        let mut request = image
            .with_container_name(self.hostname)
            .with_network(network.name());

        if !self.cmd.is_empty() {
            request = request.with_cmd(self.cmd);
        }
        for (key, value) in self.env {
            request = request.with_env_var(key, value);
        }
        for mount in self.mounts {
            let access_mode = if mount.read_only {
                AccessMode::ReadOnly
            } else {
                AccessMode::ReadWrite
            };
            request = request.with_mount(
                Mount::bind_mount(mount.source.to_string_lossy(), mount.target)
                    .with_access_mode(access_mode),
            );
        }
        for copy in self.copies {
            request = request.with_copy_to(copy.target, CopyDataSource::File(copy.source));
        }
        request
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
