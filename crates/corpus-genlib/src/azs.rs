//! AWS region to availability-zone lookup.
//!
//! The table is a module-owned constant, never mutated after construction.
//! It is intentionally not comprehensive; unknown regions resolve to the
//! [`NO_ZONE`] sentinel.

use rand::Rng;

/// Sentinel returned for regions without a known zone list.
pub const NO_ZONE: &str = "NoAZ";

/// Zone names for a region.
pub fn zones(region: &str) -> Option<&'static [&'static str]> {
    let zs: &'static [&'static str] = match region {
        "ap-east-1" => &["ap-east-1a", "ap-east-1b", "ap-east-1c"],
        "ap-northeast-1" => &["ap-northeast-1a", "ap-northeast-1c", "ap-northeast-1d"],
        "ap-northeast-2" => &[
            "ap-northeast-2a",
            "ap-northeast-2b",
            "ap-northeast-2c",
            "ap-northeast-2d",
        ],
        "ap-northeast-3" => &["ap-northeast-3a", "ap-northeast-3b", "ap-northeast-3c"],
        "ap-south-1" => &["ap-south-1a", "ap-south-1b", "ap-south-1c"],
        "ap-southeast-1" => &["ap-southeast-1a", "ap-southeast-1b", "ap-southeast-1c"],
        "ap-southeast-2" => &["ap-southeast-2a", "ap-southeast-2b", "ap-southeast-2c"],
        "ca-central-1" => &["ca-central-1a", "ca-central-1b", "ca-central-1d"],
        "eu-central-1" => &["eu-central-1a", "eu-central-1b", "eu-central-1c"],
        "eu-north-1" => &["eu-north-1a", "eu-north-1b", "eu-north-1c"],
        "eu-west-1" => &["eu-west-1a", "eu-west-1b", "eu-west-1c"],
        "eu-west-2" => &["eu-west-2a", "eu-west-2b", "eu-west-2c"],
        "eu-west-3" => &["eu-west-3a", "eu-west-3b", "eu-west-3c"],
        "me-south-1" => &["me-south-1a", "me-south-1b", "me-south-1c"],
        "sa-east-1" => &["sa-east-1a", "sa-east-1b", "sa-east-1c"],
        "us-east-1" => &[
            "us-east-1a",
            "us-east-1b",
            "us-east-1c",
            "us-east-1d",
            "us-east-1e",
            "us-east-1f",
        ],
        "us-east-2" => &["us-east-2a", "us-east-2b", "us-east-2c"],
        "us-west-1" => &["us-west-1a", "us-west-1b"],
        "us-west-2" => &["us-west-2a", "us-west-2b", "us-west-2c", "us-west-2d"],
        _ => return None,
    };
    Some(zs)
}

/// Pick a uniformly random zone for `region`, or [`NO_ZONE`] when unknown.
pub fn random_zone<R: Rng>(region: &str, rng: &mut R) -> &'static str {
    match zones(region) {
        Some(zs) => zs[rng.gen_range(0..zs.len())],
        None => NO_ZONE,
    }
}
