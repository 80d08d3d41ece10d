//! Scene files: JSON description of registry objects, for driving the dumper
//! outside a host process (CLI, fixtures).
//!
//! Формат:
//! {
//!   "objects": [
//!     {"kind":"MapArea","path":"/Game/Map/Areas.Areas:Area_1"},
//!     {"kind":"Texture","path":"/Game/Map/FogOfWar"},
//!     {"kind":"GameState","path":"/Game/Map/Level.Level:GameState_0"},
//!     {"kind":"CaptureActor","path":"/Game/Map/Level.Level:Capture_0",
//!      "transform":{"location":[0,0,50000],"rotation":{"pitch":-90}},
//!      "component":{"location":[0,0,0]}},
//!     {"kind":"MapAreaTexture","path":"/Game/Map/AreaTexture",
//!      "palette":["#FF0000FF","00FF00"],
//!      "color_to_area":[{"map_area":"/Game/Map/Areas.Areas:Area_1","min":[0,0],"max":[10,10]}],
//!      "area_data":"<base64>", "data_width":256,
//!      "capture_actor":"/Game/Map/Level.Level:Capture_0",
//!      "fog_of_war_texture":"/Game/Map/FogOfWar",
//!      "upper_left_world":[-320000,-320000,0], "world_to_map_scale":0.0008,
//!      "cached_game_state":"/Game/Map/Level.Level:GameState_0"}
//!   ]
//! }
//!
//! Ссылки задаются путями. Путь, которого нет в сцене, резолвится как absent
//! (как и null/пропущенное поле). MapAreaTexture спавнятся после всех прочих
//! объектов, в порядке файла.

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use glam::DVec3;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::model::{CaptureActor, CaptureComponent, Color, ColorAreaPair, MapAreaTexture};
use crate::registry::{ObjectData, ObjectId, ObjectRegistry};
use crate::transform::Transform;

#[derive(Debug, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum SceneObject {
    MapArea {
        path: String,
    },
    Texture {
        path: String,
    },
    GameState {
        path: String,
    },
    CaptureActor {
        path: String,
        #[serde(default)]
        transform: Transform,
        /// Relative transform of the capture component, if any.
        #[serde(default)]
        component: Option<Transform>,
    },
    MapAreaTexture(SceneTexture),
}

#[derive(Debug, Deserialize)]
pub struct SceneTexture {
    pub path: String,
    #[serde(default)]
    pub palette: Vec<String>,
    #[serde(default)]
    pub color_to_area: Vec<SceneColorArea>,
    /// Base64 (standard alphabet).
    #[serde(default)]
    pub area_data: String,
    #[serde(default)]
    pub data_width: i32,
    #[serde(default)]
    pub capture_actor: Option<String>,
    #[serde(default)]
    pub fog_of_war_texture: Option<String>,
    #[serde(default)]
    pub upper_left_world: Option<DVec3>,
    #[serde(default = "default_scale")]
    pub world_to_map_scale: f64,
    #[serde(default)]
    pub cached_game_state: Option<String>,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct SceneColorArea {
    #[serde(default)]
    pub map_area: Option<String>,
    pub min: [i32; 2],
    pub max: [i32; 2],
}

pub fn parse_scene(json: &str) -> Result<SceneFile> {
    serde_json::from_str(json).context("parse scene JSON")
}

pub fn read_scene(path: &Path) -> Result<SceneFile> {
    let text = fs::read_to_string(path).with_context(|| format!("read scene {}", path.display()))?;
    parse_scene(&text).with_context(|| format!("scene {}", path.display()))
}

/// Load a scene file straight into a fresh registry.
pub fn load_registry(path: &Path) -> Result<ObjectRegistry> {
    let scene = read_scene(path)?;
    let mut reg = ObjectRegistry::new();
    populate(&mut reg, scene)?;
    Ok(reg)
}

/// Spawn every scene object into `reg`. Returns the handles of spawned
/// map area textures, in file order.
pub fn populate(reg: &mut ObjectRegistry, scene: SceneFile) -> Result<Vec<ObjectId>> {
    let mut textures = Vec::new();
    for obj in scene.objects {
        match obj {
            SceneObject::MapArea { path } => {
                reg.spawn(path, ObjectData::MapArea)?;
            }
            SceneObject::Texture { path } => {
                reg.spawn(path, ObjectData::Texture)?;
            }
            SceneObject::GameState { path } => {
                reg.spawn(path, ObjectData::GameState)?;
            }
            SceneObject::CaptureActor {
                path,
                transform,
                component,
            } => {
                let actor = CaptureActor {
                    transform,
                    capture_component: component.map(|relative| CaptureComponent { relative }),
                };
                reg.spawn(path, ObjectData::CaptureActor(actor))?;
            }
            SceneObject::MapAreaTexture(t) => textures.push(t),
        }
    }

    let mut ids = Vec::with_capacity(textures.len());
    for t in textures {
        let path = t.path.clone();
        let tex = texture_from_scene(reg, t).with_context(|| format!("texture '{}'", path))?;
        ids.push(reg.spawn(path, ObjectData::MapAreaTexture(tex))?);
    }
    Ok(ids)
}

fn lookup_ref(reg: &ObjectRegistry, path: Option<&str>) -> Option<ObjectId> {
    let p = path?;
    let id = reg.find_by_path(p);
    if id.is_none() {
        warn!("scene reference '{}' not found, treating as absent", p);
    }
    id
}

fn texture_from_scene(reg: &ObjectRegistry, t: SceneTexture) -> Result<MapAreaTexture> {
    let color_palette = t
        .palette
        .iter()
        .map(|s| Color::from_hex(s))
        .collect::<Result<Vec<_>>>()?;

    let area_data = base64::engine::general_purpose::STANDARD
        .decode(t.area_data.trim())
        .map_err(|e| anyhow!("area_data base64 decode: {}", e))?;

    let color_to_area = t
        .color_to_area
        .iter()
        .map(|e| ColorAreaPair {
            map_area: lookup_ref(reg, e.map_area.as_deref()),
            min_x: e.min[0],
            min_y: e.min[1],
            max_x: e.max[0],
            max_y: e.max[1],
        })
        .collect();

    Ok(MapAreaTexture {
        color_palette,
        color_to_area,
        area_data,
        capture_actor: lookup_ref(reg, t.capture_actor.as_deref()),
        fog_of_war_texture: lookup_ref(reg, t.fog_of_war_texture.as_deref()),
        data_width: t.data_width,
        upper_left_world: t.upper_left_world.unwrap_or(DVec3::ZERO),
        world_to_map_scale: t.world_to_map_scale,
        cached_game_state: lookup_ref(reg, t.cached_game_state.as_deref()),
    })
}
