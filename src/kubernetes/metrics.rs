use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;
use std::str::FromStr;

#[cfg(test)]
#[path = "./metrics.tests.rs"]
mod metrics_tests;

/// Possible errors from parsing kubernetes quantities.
#[derive(thiserror::Error, Debug)]
pub enum QuantityError {
    /// Failed to parse specified quantity.
    #[error("failed to parse quantity '{0}'")]
    ParseError(String),
}

const KB: u64 = 1_000;
const KIB: u64 = 1_024;
const MB: u64 = KB * 1_000;
const MIB: u64 = KIB * 1_024;
const GB: u64 = MB * 1_000;
const GIB: u64 = MIB * 1_024;
const TB: u64 = GB * 1_000;
const TIB: u64 = GIB * 1_024;
const PB: u64 = TB * 1_000;
const PIB: u64 = TIB * 1_024;
const EB: u64 = PB * 1_000;
const EIB: u64 = PIB * 1_024;

/// CPU quantity expressed in millicores.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuQuantity {
    pub millis: u64,
}

impl CpuQuantity {
    /// Creates new [`CpuQuantity`] instance.
    pub fn new(millis: u64) -> Self {
        Self { millis }
    }
}

impl FromStr for CpuQuantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = split_unit(s)?;
        let millis = match unit {
            "" => value * 1_000.0,
            "m" => value,
            "u" => value / 1_000.0,
            "n" => value / 1_000_000.0,
            _ => return Err(QuantityError::ParseError(s.to_owned())),
        };

        Ok(CpuQuantity::new(millis.ceil() as u64))
    }
}

/// Memory or storage quantity expressed in bytes.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryQuantity {
    pub bytes: u64,
}

impl MemoryQuantity {
    /// Creates new [`MemoryQuantity`] instance.
    pub fn new(bytes: u64) -> Self {
        Self { bytes }
    }
}

impl FromStr for MemoryQuantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = split_unit(s)?;
        let multiplier = match unit.to_ascii_lowercase().as_str() {
            "" | "b" => 1,
            "k" | "kb" => KB,
            "ki" | "kib" => KIB,
            "m" | "mb" => MB,
            "mi" | "mib" => MIB,
            "g" | "gb" => GB,
            "gi" | "gib" => GIB,
            "t" | "tb" => TB,
            "ti" | "tib" => TIB,
            "p" | "pb" => PB,
            "pi" | "pib" => PIB,
            "e" | "eb" => EB,
            "ei" | "eib" => EIB,
            _ => return Err(QuantityError::ParseError(s.to_owned())),
        };

        Ok(MemoryQuantity::new((value * multiplier as f64).ceil() as u64))
    }
}

/// Returns CPU quantity in millicores, treating an absent value as zero.
pub fn cpu_millis(quantity: Option<&Quantity>) -> Result<u64, QuantityError> {
    match quantity {
        Some(quantity) => Ok(quantity.0.parse::<CpuQuantity>()?.millis),
        None => Ok(0),
    }
}

/// Returns memory or storage quantity in bytes, treating an absent value as zero.
pub fn memory_bytes(quantity: Option<&Quantity>) -> Result<u64, QuantityError> {
    match quantity {
        Some(quantity) => Ok(quantity.0.parse::<MemoryQuantity>()?.bytes),
        None => Ok(0),
    }
}

fn split_unit(input: &str) -> Result<(f64, &str), QuantityError> {
    let index = input
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(input.len());
    let (value, unit) = input.split_at(index);

    let Ok(value) = value.parse::<f64>() else {
        return Err(QuantityError::ParseError(input.to_owned()));
    };

    Ok((value, unit.trim()))
}

/// Usage figures reported for a single container.
#[derive(Clone, Debug, Deserialize)]
pub struct ContainerUsage {
    pub cpu: Option<Quantity>,
    pub memory: Option<Quantity>,
    pub storage: Option<Quantity>,
}

/// Metrics reported for a single container of a pod.
#[derive(Clone, Debug, Deserialize)]
pub struct ContainerMetrics {
    pub name: String,
    pub usage: ContainerUsage,
}

/// Pod metrics returned by the `metrics.k8s.io/v1beta1` API.\
/// The metrics types are not part of `k8s-openapi`, so the resource is declared by hand.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodMetrics {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub containers: Vec<ContainerMetrics>,
}

impl kube::Resource for PodMetrics {
    type DynamicType = ();
    type Scope = kube::core::NamespaceResourceScope;

    fn group(_dt: &()) -> std::borrow::Cow<'_, str> {
        "metrics.k8s.io".into()
    }

    fn version(_dt: &()) -> std::borrow::Cow<'_, str> {
        "v1beta1".into()
    }

    fn kind(_dt: &()) -> std::borrow::Cow<'_, str> {
        "PodMetrics".into()
    }

    fn plural(_dt: &()) -> std::borrow::Cow<'_, str> {
        "pods".into()
    }

    fn api_version(_dt: &()) -> std::borrow::Cow<'_, str> {
        "metrics.k8s.io/v1beta1".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
