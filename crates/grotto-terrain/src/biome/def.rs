//! Biome definition: the validated, immutable settings of one biome type.

use grotto_config::{
    BiomeConfig, BlendMode, CaveSettings, DecorationPlacement, NoiseConfig, RadiusRange,
};
use grotto_tiles::{Direction, TileAtlas, TileId};

use crate::error::ConfigurationError;
use crate::field::ThresholdField;
use crate::structure::StructureSource;
use crate::weighted::WeightedTable;

/// A decoration rule with its tiles resolved.
#[derive(Clone, Debug)]
pub struct DecorationRule {
    /// Candidate tiles.
    pub placement: DecorationPlacement,
    /// Density gate.
    pub density: NoiseConfig,
    /// Weighted decoration tiles.
    pub table: WeightedTable<TileId>,
}

/// Which neighbours a region tunnels into.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionRule {
    /// Per-direction enable flags, indexed like [`Direction::ALL`].
    pub enabled: [bool; 4],
    /// Directions preferred over all others when their neighbour exists.
    pub forced: Vec<Direction>,
    /// Tunnel radius range.
    pub radius: RadiusRange,
    /// Depth of the border window searched on each side.
    pub scan_size: u32,
}

impl ConnectionRule {
    /// Returns `true` if `direction` is enabled or forced.
    pub fn allows(&self, direction: Direction) -> bool {
        self.is_forced(direction) || self.enabled[direction_index(direction)]
    }

    /// Returns `true` if `direction` is forced.
    pub fn is_forced(&self, direction: Direction) -> bool {
        self.forced.contains(&direction)
    }
}

fn direction_index(direction: Direction) -> usize {
    match direction {
        Direction::Left => 0,
        Direction::Right => 1,
        Direction::Up => 2,
        Direction::Down => 3,
    }
}

/// How region borders are painted into different neighbouring biomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendRule {
    /// Sampling mode.
    pub mode: BlendMode,
    /// Step and disc radius range.
    pub radius: RadiusRange,
}

/// A structure that may appear in a region.
#[derive(Clone, Debug, PartialEq)]
pub struct StructureSpawn {
    /// Structure name.
    pub name: String,
    /// Probability per region.
    pub chance: f64,
}

/// Full descriptor for a biome type.
#[derive(Clone, Debug)]
pub struct BiomeDef {
    /// Unique biome name.
    pub name: String,
    /// Relative spawn weight, positive.
    pub spawn_weight: f64,
    /// Probability of copying a neighbouring cell's biome instead.
    pub copy_chance: f64,
    /// Probability of spreading into neighbouring cells.
    pub expansion_chance: f64,
    /// Subtracted from the expansion chance at every step outward.
    pub expansion_decay: f64,
    /// Solid terrain tile.
    pub base_tile: TileId,
    /// Layout noise.
    pub noise: NoiseConfig,
    /// Smoothing and room settings.
    pub cave: CaveSettings,
    /// Decoration rules in application order.
    pub decorations: Vec<DecorationRule>,
    /// Cross-region tunnel rule.
    pub connection: ConnectionRule,
    /// Border blending rule.
    pub blend: BlendRule,
    /// Structures stamped after decoration.
    pub structures: Vec<StructureSpawn>,
}

fn check_chance(what: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigurationError::ChanceOutOfRange { what, value })
    }
}

fn check_radius(radius: RadiusRange) -> Result<RadiusRange, ConfigurationError> {
    if radius.min > radius.max {
        return Err(ConfigurationError::InvalidRadius {
            min: radius.min,
            max: radius.max,
        });
    }
    Ok(radius)
}

/// Tunnels must be at least a plus shape wide: a bare line steps diagonally,
/// which 4-connected rooms cannot walk through.
fn check_tunnel_radius(
    radius: RadiusRange,
    what: &'static str,
) -> Result<RadiusRange, ConfigurationError> {
    let radius = check_radius(radius)?;
    if radius.min == 0 {
        return Err(ConfigurationError::ZeroTunnelRadius(what));
    }
    Ok(radius)
}

fn check_noise(noise: &NoiseConfig) -> Result<NoiseConfig, ConfigurationError> {
    ThresholdField::from_config(noise, 0)?;
    Ok(noise.clone())
}

impl BiomeDef {
    /// Validates `config` and resolves its tile and structure names.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn from_config(
        config: &BiomeConfig,
        atlas: &TileAtlas,
        structures: &dyn StructureSource,
    ) -> Result<Self, ConfigurationError> {
        if !config.spawn_weight.is_finite() || config.spawn_weight <= 0.0 {
            return Err(ConfigurationError::InvalidWeight(config.spawn_weight));
        }
        let copy_chance = check_chance("copy_chance", config.copy_chance)?;
        let expansion_chance = check_chance("expansion_chance", config.expansion_chance)?;
        let expansion_decay = check_chance("expansion_decay", config.expansion_decay)?;

        let base_tile = atlas
            .lookup_by_name(&config.base_tile)
            .ok_or_else(|| ConfigurationError::UnknownTile(config.base_tile.clone()))?;
        if !atlas.class_of(base_tile).is_solid() {
            return Err(ConfigurationError::TileClassMismatch {
                name: config.base_tile.clone(),
                expected: "solid",
            });
        }

        let noise = check_noise(&config.noise)?;
        if !(0..=4).contains(&config.cave.roughness_offset) {
            return Err(ConfigurationError::RoughnessOutOfRange(
                config.cave.roughness_offset,
            ));
        }
        check_tunnel_radius(config.cave.tunnel_radius, "cave.tunnel_radius")?;

        let mut decorations = Vec::with_capacity(config.decorations.len());
        for rule in &config.decorations {
            let mut entries = Vec::with_capacity(rule.entries.len());
            for entry in &rule.entries {
                let id = atlas
                    .lookup_by_name(&entry.tile)
                    .ok_or_else(|| ConfigurationError::UnknownTile(entry.tile.clone()))?;
                if atlas.class_of(id).is_solid() {
                    return Err(ConfigurationError::TileClassMismatch {
                        name: entry.tile.clone(),
                        expected: "passable",
                    });
                }
                entries.push((id, entry.weight));
            }
            decorations.push(DecorationRule {
                placement: rule.placement,
                density: check_noise(&rule.density)?,
                table: WeightedTable::new(entries)?,
            });
        }

        let connection = ConnectionRule {
            enabled: [
                config.connection.left,
                config.connection.right,
                config.connection.up,
                config.connection.down,
            ],
            forced: config.connection.forced.clone(),
            radius: check_tunnel_radius(config.connection.radius, "connection.radius")?,
            scan_size: config.connection.scan_size,
        };

        let blend = BlendRule {
            mode: config.blend.mode,
            radius: check_radius(config.blend.radius)?,
        };

        let mut spawns = Vec::with_capacity(config.structures.len());
        for spawn in &config.structures {
            if structures.structure(&spawn.name).is_none() {
                return Err(ConfigurationError::UnknownStructure(spawn.name.clone()));
            }
            spawns.push(StructureSpawn {
                name: spawn.name.clone(),
                chance: check_chance("structure chance", spawn.chance)?,
            });
        }

        Ok(Self {
            name: config.name.clone(),
            spawn_weight: config.spawn_weight,
            copy_chance,
            expansion_chance,
            expansion_decay,
            base_tile,
            noise,
            cave: config.cave.clone(),
            decorations,
            connection,
            blend,
            structures: spawns,
        })
    }
}
