//! Live object registry (arena) + instance enumeration.
//!
//! Объекты живут в слотах `Vec<Slot>`; хэндл `ObjectId` = (index, generation).
//! Жизненный цикл слота:
//!   live      — object = Some(..)
//!   null      — destroy(): object = None, generation++ (слот ещё не переиспользован)
//!   free      — collect_garbage(): null-слоты уходят во free-list
//!   live      — spawn() берёт слот из free-list (или добавляет новый)
//!
//! Хэндл на уничтоженный объект больше не резолвится (generation не совпадает).
//! Enumeration идёт в порядке слотов и молча пропускает null/free слоты.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fmt;

use crate::model::{CaptureActor, MapAreaTexture};

/// Kind of object stored in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    MapAreaTexture,
    MapArea,
    CaptureActor,
    Texture,
    GameState,
}

impl TypeTag {
    /// Type name used as the default fallback label for absent references.
    pub fn type_name(self) -> &'static str {
        match self {
            TypeTag::MapAreaTexture => "MapAreaTexture",
            TypeTag::MapArea => "MapArea",
            TypeTag::CaptureActor => "MinimapCaptureActor",
            TypeTag::Texture => "Texture2D",
            TypeTag::GameState => "GameState",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Stable handle into [`ObjectRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    pub fn index(&self) -> u32 {
        self.index
    }
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Payload of a registry object. Opaque kinds (areas, textures, game states)
/// carry nothing beyond their path.
#[derive(Debug, Clone)]
pub enum ObjectData {
    MapAreaTexture(MapAreaTexture),
    MapArea,
    CaptureActor(CaptureActor),
    Texture,
    GameState,
}

impl ObjectData {
    pub fn tag(&self) -> TypeTag {
        match self {
            ObjectData::MapAreaTexture(_) => TypeTag::MapAreaTexture,
            ObjectData::MapArea => TypeTag::MapArea,
            ObjectData::CaptureActor(_) => TypeTag::CaptureActor,
            ObjectData::Texture => TypeTag::Texture,
            ObjectData::GameState => TypeTag::GameState,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Object {
    /// Hierarchical path name, unique within the registry
    /// (e.g. "/Game/Map/Persistent_Level.Persistent_Level:PersistentLevel.MapArea_12").
    pub path: String,
    pub data: ObjectData,
}

impl Object {
    pub fn tag(&self) -> TypeTag {
        self.data.tag()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<Object>,
}

#[derive(Debug, Default)]
pub struct ObjectRegistry {
    slots: Vec<Slot>,
    // destroy() -> pending; collect_garbage() -> free
    pending: Vec<u32>,
    free: Vec<u32>,
    by_path: HashMap<String, ObjectId>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object. Path names must be unique among live objects.
    pub fn spawn(&mut self, path: impl Into<String>, data: ObjectData) -> Result<ObjectId> {
        let path = path.into();
        if path.is_empty() {
            return Err(anyhow!("object path must not be empty"));
        }
        if self.by_path.contains_key(&path) {
            return Err(anyhow!("duplicate object path '{}'", path));
        }

        let object = Object {
            path: path.clone(),
            data,
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.object = Some(object);
                ObjectId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .map_err(|_| anyhow!("object registry is full"))?;
                self.slots.push(Slot {
                    generation: 0,
                    object: Some(object),
                });
                ObjectId {
                    index,
                    generation: 0,
                }
            }
        };
        self.by_path.insert(path, id);
        Ok(id)
    }

    /// Destroy a live object. The slot stays a null slot until the next
    /// [`collect_garbage`](Self::collect_garbage). Returns false for stale handles.
    pub fn destroy(&mut self, id: ObjectId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if slot.generation != id.generation || slot.object.is_none() {
            return false;
        }
        if let Some(obj) = slot.object.take() {
            self.by_path.remove(&obj.path);
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.pending.push(id.index);
        true
    }

    /// Reclaim null slots for reuse. Returns the number of reclaimed slots.
    pub fn collect_garbage(&mut self) -> usize {
        let n = self.pending.len();
        self.free.append(&mut self.pending);
        n
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_ref()
    }

    pub fn find_by_path(&self, path: &str) -> Option<ObjectId> {
        self.by_path.get(path).copied()
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn map_area_texture(&self, id: ObjectId) -> Option<&MapAreaTexture> {
        match &self.get(id)?.data {
            ObjectData::MapAreaTexture(t) => Some(t),
            _ => None,
        }
    }

    pub fn capture_actor(&self, id: ObjectId) -> Option<&CaptureActor> {
        match &self.get(id)?.data {
            ObjectData::CaptureActor(a) => Some(a),
            _ => None,
        }
    }

    /// Snapshot of every live instance of `tag`, in slot order.
    /// Null slots (destroyed, not yet collected) are skipped.
    pub fn enumerate_live(&self, tag: TypeTag) -> Vec<ObjectId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match &slot.object {
                Some(obj) if obj.tag() == tag => Some(ObjectId {
                    index: index as u32,
                    generation: slot.generation,
                }),
                _ => None,
            })
            .collect()
    }

    /// Number of live objects (all kinds).
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.object.is_some()).count()
    }

    /// Number of destroyed-but-not-collected slots.
    pub fn null_slots(&self) -> usize {
        self.pending.len()
    }
}
