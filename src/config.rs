//! Configuration management for cidrcap.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::validation::{validate_max_blocks, validate_variable_name};

/// Ingress rules allowed per security group.
pub const DEFAULT_MAX_BLOCKS: usize = 60;

/// Terraform local value holding the generated list.
pub const DEFAULT_VARIABLE: &str = "external_k8s_cidr_ipv4";

/// Generated artifact path, relative to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "pet_instances/gh_sg.tf";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Maximum number of CIDR blocks to emit (one rule each)
    pub max_blocks: usize,

    /// Where the generated Terraform file is written
    pub output_file: PathBuf,

    /// Name of the generated local value
    pub variable: String,

    /// Named groups of CIDR ranges to cover
    pub sources: Vec<CidrSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_blocks: DEFAULT_MAX_BLOCKS,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            variable: DEFAULT_VARIABLE.to_string(),
            sources: default_sources(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CidrSource {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub cidrs: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to load config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to embedded defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config at {:?}, using built-in defaults", path);
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).context("Failed to parse configuration YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_max_blocks(self.max_blocks)?;
        validate_variable_name(&self.variable)?;

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                anyhow::bail!("Source names cannot be empty");
            }
            if !seen.insert(source.name.as_str()) {
                anyhow::bail!("Duplicate source name '{}'", source.name);
            }
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::render::write_atomic(path.as_ref(), &Self::to_yaml_with_header(self)?)
    }

    /// All CIDR entries of enabled sources, in configuration order
    pub fn enabled_cidrs(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.enabled)
            .flat_map(|s| s.cidrs.iter().map(String::as_str))
            .collect()
    }

    /// Names of enabled sources
    pub fn enabled_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> Result<String> {
        Self::to_yaml_with_header(&Config::default())
    }

    fn to_yaml_with_header(config: &Config) -> Result<String> {
        let body = serde_yaml::to_string(config).context("Failed to serialize config")?;
        Ok(format!("{}{}", CONFIG_HEADER, body))
    }
}

const CONFIG_HEADER: &str = "\
# cidrcap configuration
#
# max_blocks:  rule budget of the security group; the generated list never
#              holds more blocks than this (minimum 1)
# output_file: generated Terraform file
# variable:    name of the generated local value
# sources:     named CIDR groups; entries that are not IPv4 CIDRs are skipped
";

fn default_sources() -> Vec<CidrSource> {
    vec![
        CidrSource {
            name: "meta".to_string(),
            enabled: true,
            cidrs: META_RANGES.iter().map(|s| s.to_string()).collect(),
        },
        CidrSource {
            name: "aws".to_string(),
            enabled: true,
            cidrs: AWS_RANGES.iter().map(|s| s.to_string()).collect(),
        },
    ]
}

const META_RANGES: &[&str] = &[
    "129.134.0.0/19",
    "66.220.144.0/20",
    "34.94.18.0/25",
    "35.192.199.128/25",
    "163.114.128.0/20",
    "157.240.128.0/18",
    "102.221.188.0/22",
    "31.13.96.0/19",
    "129.134.96.0/20",
    "18.190.96.139/32",
    "185.60.216.0/22",
    "102.132.112.0/20",
    "129.134.64.0/20",
    "157.240.192.0/18",
    "185.89.216.0/22",
    "35.239.7.131/32",
    "31.13.64.0/19",
    "204.15.20.0/22",
    "157.240.0.0/19",
    "179.60.192.0/22",
    "103.4.96.0/22",
    "69.63.176.0/20",
    "74.119.76.0/22",
    "163.70.128.0/17",
    "157.240.64.0/19",
    "69.171.224.0/19",
    "173.252.64.0/18",
    "129.134.80.0/20",
    "173.252.64.0/22",
    "147.75.208.0/20",
    "199.201.64.0/22",
    "66.111.48.0/22",
    "157.240.32.0/19",
    "163.77.128.0/17",
    "34.82.178.0/25",
    "129.134.32.0/19",
    "31.13.24.0/21",
    "45.64.40.0/22",
    "129.134.128.0/17",
    "102.132.96.0/20",
];

const AWS_RANGES: &[&str] = &[
    "13.248.16.0/25",
    "13.248.48.0/25",
    "15.248.48.0/25",
    "15.248.54.236/31",
    "15.248.64.0/25",
    "15.248.70.236/31",
    "27.0.3.144/29",
    "27.0.3.152/29",
    "52.46.80.0/25",
    "52.46.208.0/25",
    "52.46.249.224/29",
    "52.46.249.248/29",
    "52.82.200.0/25",
    "52.94.36.0/25",
    "52.94.84.0/25",
    "52.94.133.128/25",
    "52.94.133.128/30",
    "52.94.133.136/30",
    "52.95.4.0/25",
    "52.95.75.0/25",
    "52.119.144.0/25",
    "54.222.61.32/28",
    "54.239.6.176/29",
    "54.239.6.184/29",
    "54.239.119.0/25",
    "54.240.193.0/29",
    "54.240.193.128/29",
    "54.240.196.160/27",
    "54.240.196.160/28",
    "54.240.196.176/28",
    "54.240.197.224/28",
    "54.240.198.32/29",
    "54.240.199.96/28",
    "54.240.217.8/29",
    "54.240.217.16/29",
    "69.157.200.212/32",
    "69.165.90.4/32",
    "69.165.90.12/32",
    "70.232.80.0/25",
    "70.232.112.0/25",
    "72.21.196.64/29",
    "72.21.198.64/29",
    "99.77.16.0/25",
    "99.77.48.0/25",
    "99.78.144.128/25",
    "99.78.200.0/25",
    "99.78.232.0/25",
    "99.82.144.0/25",
    "99.87.8.0/25",
    "104.153.113.16/28",
    "104.153.114.16/28",
    "177.72.241.16/29",
    "177.72.242.16/29",
    "204.246.162.32/28",
    "205.251.233.48/29",
    "205.251.233.104/29",
    "205.251.233.176/29",
    "205.251.233.232/29",
    "205.251.237.64/28",
    "205.251.237.96/28",
];
