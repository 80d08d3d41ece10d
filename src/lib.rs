#![allow(non_snake_case)]

// Базовые модули
pub mod consts;
pub mod config;
pub mod metrics;
pub mod lock;

// Исходные данные: реестр живых объектов + модель
pub mod registry;
pub mod model;
pub mod transform;

// Пайплайн дампа: resolve -> encode -> document -> writer
pub mod resolve;
pub mod geometry;
pub mod document;
pub mod writer;
pub mod dumper;

// Загрузка сцены из JSON (CLI, фикстуры)
pub mod scene;

// Удобные реэкспорты
pub use config::{DumpConfig, DumperBuilder};
pub use document::{DocumentBuilder, DocumentOptions, TextureDocument};
pub use dumper::{collect_documents, CommandSender, DumpReport, ExecutionStatus, MapAreaDumper};
pub use model::{CaptureActor, CaptureComponent, Color, ColorAreaPair, MapAreaTexture};
pub use registry::{Object, ObjectData, ObjectId, ObjectRegistry, TypeTag};
pub use resolve::{ResolvedRef, Resolver};
pub use transform::{Rotator, Transform, WorldPose};
pub use writer::{dump_path, list_dumps, write_snapshot, WriteOptions, WrittenSnapshot};
