//! Dump document schema + builder.
//!
//! Один `TextureDocument` на каждый живой MapAreaTexture. Набор и порядок ключей
//! задаются структурами ниже (serde сериализует поля в порядке объявления):
//!
//! ```text
//! {
//!   "mFogOfWarTexture": "<path | NULL Texture2D>",
//!   "mAreaData":        "<base64>",
//!   "mColorPalette":    ["#RRGGBBAA", ...],
//!   "mColorToArea":     [{"MapArea": "...", "Min": [x, y], "Max": [x, y]}, ...],
//!   "mCaptureActor":    {"Path": "...", [world block], ["Component": {...}]},
//!   "mDataWidth":       <int>,
//!   "mUpperLeftWorld":  [x, y, z],
//!   "mWorldToMapScale": <number>,
//!   "mCachedGameState": "<path | NULL GameState>"
//! }
//! ```
//!
//! World block (`Location`..`VecUp`) присутствует только если capture actor
//! резолвится; `Component` только если у него есть capture component.
//! Отсутствующие блоки опускаются целиком, а не пишутся как null.

use base64::Engine;
use log::{debug, warn};
use serde::Serialize;

use crate::geometry::{encode_euler, encode_quat, encode_vector3, encode_xy};
use crate::model::{CaptureActor, CaptureComponent, ColorAreaPair, MapAreaTexture};
use crate::registry::{ObjectData, ObjectId, TypeTag};
use crate::resolve::Resolver;
use crate::transform::Transform;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureDocument {
    #[serde(rename = "mFogOfWarTexture")]
    pub fog_of_war_texture: String,
    #[serde(rename = "mAreaData")]
    pub area_data: String,
    #[serde(rename = "mColorPalette")]
    pub color_palette: Vec<String>,
    #[serde(rename = "mColorToArea")]
    pub color_to_area: Vec<ColorToAreaEntry>,
    #[serde(rename = "mCaptureActor")]
    pub capture_actor: CaptureActorDocument,
    #[serde(rename = "mDataWidth")]
    pub data_width: i32,
    #[serde(rename = "mUpperLeftWorld")]
    pub upper_left_world: [f64; 3],
    #[serde(rename = "mWorldToMapScale")]
    pub world_to_map_scale: f64,
    #[serde(rename = "mCachedGameState")]
    pub cached_game_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColorToAreaEntry {
    pub map_area: String,
    pub min: [i32; 2],
    pub max: [i32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptureActorDocument {
    pub path: String,
    #[serde(flatten)]
    pub world: Option<WorldTransformBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentDocument>,
}

/// World-space transform of the capture actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorldTransformBlock {
    pub location: [f64; 3],
    pub rotation: [f64; 3],
    pub quat: [f64; 4],
    pub vec_fwd: [f64; 3],
    pub vec_right: [f64; 3],
    pub vec_up: [f64; 3],
}

/// Capture component: world-space values plus parent-local `Relative*`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComponentDocument {
    pub location: [f64; 3],
    pub relative_location: [f64; 3],
    pub rotation: [f64; 3],
    pub relative_rotation: [f64; 3],
    pub quat: [f64; 4],
    pub vec_fwd: [f64; 3],
    pub vec_right: [f64; 3],
    pub vec_up: [f64; 3],
}

/// Formatting knobs that do not change the key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Prefix palette hex strings with '#'.
    pub hex_prefix: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self { hex_prefix: true }
    }
}

pub struct DocumentBuilder<'a> {
    resolver: Resolver<'a>,
    opts: DocumentOptions,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(resolver: Resolver<'a>, opts: DocumentOptions) -> Self {
        Self { resolver, opts }
    }

    /// Build documents for the given handles, in order. Handles that no longer
    /// point at a live MapAreaTexture are skipped.
    pub fn build_all(&self, ids: &[ObjectId]) -> Vec<TextureDocument> {
        let registry = self.resolver.registry();
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(obj) = registry.get(id) else {
                warn!("skip stale handle {:?}", id);
                continue;
            };
            let ObjectData::MapAreaTexture(tex) = &obj.data else {
                warn!("skip {}: not a {}", obj.path, TypeTag::MapAreaTexture);
                continue;
            };
            debug!("Dumping {}", obj.path);
            out.push(self.build(tex));
        }
        out
    }

    pub fn build(&self, tex: &MapAreaTexture) -> TextureDocument {
        let r = &self.resolver;
        TextureDocument {
            fog_of_war_texture: r.path(tex.fog_of_war_texture, TypeTag::Texture),
            area_data: base64::engine::general_purpose::STANDARD.encode(&tex.area_data),
            color_palette: tex
                .color_palette
                .iter()
                .map(|c| {
                    if self.opts.hex_prefix {
                        format!("#{}", c.to_hex())
                    } else {
                        c.to_hex()
                    }
                })
                .collect(),
            color_to_area: tex
                .color_to_area
                .iter()
                .map(|p| self.color_to_area_entry(p))
                .collect(),
            capture_actor: self.capture_actor_document(tex.capture_actor),
            data_width: tex.data_width,
            upper_left_world: encode_vector3(tex.upper_left_world),
            world_to_map_scale: tex.world_to_map_scale,
            cached_game_state: r.path(tex.cached_game_state, TypeTag::GameState),
        }
    }

    fn color_to_area_entry(&self, p: &ColorAreaPair) -> ColorToAreaEntry {
        ColorToAreaEntry {
            map_area: self.resolver.path(p.map_area, TypeTag::MapArea),
            min: encode_xy(p.min_x, p.min_y),
            max: encode_xy(p.max_x, p.max_y),
        }
    }

    fn capture_actor_document(&self, r: Option<ObjectId>) -> CaptureActorDocument {
        let path = self.resolver.path(r, TypeTag::CaptureActor);
        let actor = r.and_then(|id| self.resolver.registry().capture_actor(id));
        match actor {
            None => CaptureActorDocument {
                path,
                world: None,
                component: None,
            },
            Some(actor) => CaptureActorDocument {
                path,
                world: Some(world_block(&actor.transform)),
                component: actor
                    .capture_component
                    .as_ref()
                    .map(|c| component_document(actor, c)),
            },
        }
    }
}

fn world_block(t: &Transform) -> WorldTransformBlock {
    WorldTransformBlock {
        location: encode_vector3(t.location),
        rotation: encode_euler(&t.rotation),
        quat: encode_quat(t.quat()),
        vec_fwd: encode_vector3(t.forward()),
        vec_right: encode_vector3(t.right()),
        vec_up: encode_vector3(t.up()),
    }
}

fn component_document(owner: &CaptureActor, comp: &CaptureComponent) -> ComponentDocument {
    let world = comp.world_pose(&owner.transform);
    ComponentDocument {
        location: encode_vector3(world.location),
        relative_location: encode_vector3(comp.relative.location),
        rotation: encode_euler(&world.rotator()),
        relative_rotation: encode_euler(&comp.relative.rotation),
        quat: encode_quat(world.rotation),
        vec_fwd: encode_vector3(world.forward()),
        vec_right: encode_vector3(world.right()),
        vec_up: encode_vector3(world.up()),
    }
}
