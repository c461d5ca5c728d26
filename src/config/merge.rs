//! Merge engine: resolve each known key to exactly one layer's value.
//!
//! Precedence is CLI (when the flag was explicitly given) > Env > File >
//! Default. Keys the registry doesn't know are dropped.

use std::collections::BTreeSet;

use super::defaults::Registry;
use super::key::{ConfigKey, Layer, LayerMap, LayeredValue, MergedMap, RawValue};

/// Keys whose CLI flag the user explicitly supplied.
pub type PresenceSet = BTreeSet<ConfigKey>;

/// The CLI layer: parsed flag values plus which of them were actually given.
#[derive(Debug, Clone, Default)]
pub struct CliLayer {
    pub values: LayerMap,
    pub present: PresenceSet,
}

impl CliLayer {
    /// Values whose flag is in the presence set.
    pub fn present_values(&self) -> impl Iterator<Item = (&ConfigKey, &RawValue)> {
        self.values.iter().filter(|(key, _)| self.present.contains(*key))
    }
}

pub fn merge(
    registry: &Registry,
    defaults: &LayerMap,
    file: &LayerMap,
    env: &LayerMap,
    cli: &CliLayer,
) -> MergedMap {
    warn_unknown(registry, file, Layer::File);
    warn_unknown(registry, env, Layer::Env);

    let cli_present: LayerMap =
        cli.present_values().map(|(key, value)| (key.clone(), value.clone())).collect();

    let mut merged = MergedMap::new();
    for key in registry.keys() {
        let winner = [
            (Layer::Default, defaults),
            (Layer::File, file),
            (Layer::Env, env),
            (Layer::Cli, &cli_present),
        ]
        .into_iter()
        .filter_map(|(layer, map)| map.get(key).map(|value| LayeredValue::new(value.clone(), layer)))
        .reduce(LayeredValue::overlay);

        if let Some(winner) = winner {
            tracing::debug!("{} resolved from {} layer", key, winner.layer);
            merged.insert(key.clone(), winner);
        }
    }
    merged
}

fn warn_unknown(registry: &Registry, layer_map: &LayerMap, layer: Layer) {
    for key in layer_map.keys().filter(|key| !registry.contains(key)) {
        tracing::warn!("Ignoring unknown config key '{}' from {} layer", key, layer);
    }
}
