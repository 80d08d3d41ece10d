use anyhow::Result;
use approx::assert_relative_eq;
use base64::Engine;
use glam::DVec3;
use serde_json::Value;

use MapAreaDump::{
    collect_documents, CaptureActor, CaptureComponent, Color, ColorAreaPair, DocumentOptions,
    MapAreaTexture, ObjectData, ObjectRegistry, Rotator, Transform,
};

const TOP_LEVEL_KEYS: [&str; 9] = [
    "mFogOfWarTexture",
    "mAreaData",
    "mColorPalette",
    "mColorToArea",
    "mCaptureActor",
    "mDataWidth",
    "mUpperLeftWorld",
    "mWorldToMapScale",
    "mCachedGameState",
];

const WORLD_KEYS: [&str; 6] = ["Location", "Rotation", "Quat", "VecFwd", "VecRight", "VecUp"];

fn dump_values(reg: &ObjectRegistry) -> Result<Vec<Value>> {
    let docs = collect_documents(reg, DocumentOptions::default());
    let v = serde_json::to_value(&docs)?;
    Ok(v.as_array().cloned().unwrap_or_default())
}

fn as_f64s(v: &Value) -> Vec<f64> {
    v.as_array()
        .map(|a| a.iter().filter_map(|x| x.as_f64()).collect())
        .unwrap_or_default()
}

/// Registry with one texture per capture-actor variant:
/// no actor, actor without component, actor with component.
fn three_variants() -> Result<ObjectRegistry> {
    let mut reg = ObjectRegistry::new();
    let bare = reg.spawn(
        "/Game/Map/Level.Level:PersistentLevel.Capture_Bare",
        ObjectData::CaptureActor(CaptureActor {
            transform: Transform::new(DVec3::new(1.0, 2.0, 3.0), Rotator::ZERO),
            capture_component: None,
        }),
    )?;
    let full = reg.spawn(
        "/Game/Map/Level.Level:PersistentLevel.Capture_Full",
        ObjectData::CaptureActor(CaptureActor {
            transform: Transform::new(DVec3::new(100.0, 0.0, 0.0), Rotator::new(0.0, 90.0, 0.0)),
            capture_component: Some(CaptureComponent {
                relative: Transform::new(
                    DVec3::new(10.0, 0.0, 0.0),
                    Rotator::new(-90.0, 0.0, 0.0),
                ),
            }),
        }),
    )?;

    for (name, actor) in [("None", None), ("Bare", Some(bare)), ("Full", Some(full))] {
        reg.spawn(
            format!("/Game/Map/AreaTexture_{name}"),
            ObjectData::MapAreaTexture(MapAreaTexture {
                capture_actor: actor,
                ..Default::default()
            }),
        )?;
    }
    Ok(reg)
}

#[test]
fn every_document_has_exactly_nine_keys_in_order() -> Result<()> {
    let reg = three_variants()?;
    let docs = collect_documents(&reg, DocumentOptions::default());
    assert_eq!(docs.len(), 3);

    for doc in &docs {
        let v = serde_json::to_value(doc)?;
        let obj = v.as_object().expect("document must be an object");
        assert_eq!(obj.len(), TOP_LEVEL_KEYS.len(), "keys: {:?}", obj.keys());
        for k in TOP_LEVEL_KEYS {
            assert!(obj.contains_key(k), "missing {k}");
        }

        // Порядок ключей — контракт формата.
        let text = serde_json::to_string(doc)?;
        let mut last = 0usize;
        for k in TOP_LEVEL_KEYS {
            let pos = text
                .find(&format!("\"{k}\""))
                .unwrap_or_else(|| panic!("{k} not in {text}"));
            assert!(pos >= last, "{k} out of order in {text}");
            last = pos;
        }
    }
    Ok(())
}

#[test]
fn capture_blocks_present_iff_references_resolve() -> Result<()> {
    let reg = three_variants()?;
    let docs = dump_values(&reg)?;

    // 1) no actor: Path only
    let none = docs[0]["mCaptureActor"].as_object().expect("object");
    assert_eq!(none.len(), 1);
    assert_eq!(none["Path"], "NULL MinimapCaptureActor");

    // 2) actor without component: Path + world block, no Component key at all
    let bare = docs[1]["mCaptureActor"].as_object().expect("object");
    assert_eq!(bare["Path"], "/Game/Map/Level.Level:PersistentLevel.Capture_Bare");
    for k in WORLD_KEYS {
        assert!(bare.contains_key(k), "missing {k}");
    }
    assert!(!bare.contains_key("Component"));
    assert_eq!(bare.len(), 1 + WORLD_KEYS.len());
    assert_eq!(as_f64s(&bare["Location"]), vec![1.0, 2.0, 3.0]);
    assert_eq!(as_f64s(&bare["Quat"]), vec![1.0, 0.0, 0.0, 0.0]);

    // 3) actor with component
    let full = docs[2]["mCaptureActor"].as_object().expect("object");
    let comp = full["Component"].as_object().expect("Component object");
    let comp_keys = [
        "Location",
        "RelativeLocation",
        "Rotation",
        "RelativeRotation",
        "Quat",
        "VecFwd",
        "VecRight",
        "VecUp",
    ];
    assert_eq!(comp.len(), comp_keys.len());
    for k in comp_keys {
        assert!(comp.contains_key(k), "missing Component.{k}");
    }
    Ok(())
}

#[test]
fn world_and_relative_transforms_are_encoded() -> Result<()> {
    let reg = three_variants()?;
    let docs = dump_values(&reg)?;
    let actor = &docs[2]["mCaptureActor"];

    // Actor: yaw 90 -> [roll, pitch, yaw] = [0, 0, 90]
    assert_eq!(as_f64s(&actor["Rotation"]), vec![0.0, 0.0, 90.0]);
    let q = as_f64s(&actor["Quat"]);
    assert_eq!(q.len(), 4);
    let h = std::f64::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(q[0], h, epsilon = 1e-12); // w
    assert_relative_eq!(q[3], h, epsilon = 1e-12); // z
    let fwd = as_f64s(&actor["VecFwd"]);
    assert_relative_eq!(fwd[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(fwd[1], 1.0, epsilon = 1e-12);

    // Component: relative (10,0,0) pitched down, under a yawed parent at (100,0,0)
    let comp = &actor["Component"];
    assert_eq!(as_f64s(&comp["RelativeLocation"]), vec![10.0, 0.0, 0.0]);
    assert_eq!(as_f64s(&comp["RelativeRotation"]), vec![0.0, -90.0, 0.0]);

    let loc = as_f64s(&comp["Location"]);
    assert_relative_eq!(loc[0], 100.0, epsilon = 1e-9);
    assert_relative_eq!(loc[1], 10.0, epsilon = 1e-9);
    assert_relative_eq!(loc[2], 0.0, epsilon = 1e-9);

    let rot = as_f64s(&comp["Rotation"]);
    assert_eq!(rot.len(), 3);
    assert_relative_eq!(rot[1], -90.0, epsilon = 1e-9);

    let cfwd = as_f64s(&comp["VecFwd"]);
    assert_relative_eq!(cfwd[0], 0.0, epsilon = 1e-9);
    assert_relative_eq!(cfwd[1], 0.0, epsilon = 1e-9);
    assert_relative_eq!(cfwd[2], -1.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn component_orientation_follows_composed_quaternion() -> Result<()> {
    let mut reg = ObjectRegistry::new();
    let steep = reg.spawn(
        "/Game/Map/Level.Level:PersistentLevel.Capture_Steep",
        ObjectData::CaptureActor(CaptureActor {
            transform: Transform::new(DVec3::new(0.0, 0.0, 50_000.0), Rotator::new(-89.95, 0.0, 0.0)),
            capture_component: Some(CaptureComponent::default()),
        }),
    )?;
    let parent = Transform::new(DVec3::ZERO, Rotator::new(30.0, 170.0, -20.0));
    let relative = Transform::new(DVec3::ZERO, Rotator::new(40.0, 60.0, 15.0));
    let tilted = reg.spawn(
        "/Game/Map/Level.Level:PersistentLevel.Capture_Tilted",
        ObjectData::CaptureActor(CaptureActor {
            transform: parent,
            capture_component: Some(CaptureComponent { relative }),
        }),
    )?;
    for (name, actor) in [("Steep", steep), ("Tilted", tilted)] {
        reg.spawn(
            format!("/Game/Map/AreaTexture_{name}"),
            ObjectData::MapAreaTexture(MapAreaTexture {
                capture_actor: Some(actor),
                ..Default::default()
            }),
        )?;
    }
    let docs = dump_values(&reg)?;

    // Identity component under a nearly vertical actor: same orientation as the actor.
    let actor = &docs[0]["mCaptureActor"];
    let comp = &actor["Component"];
    for key in ["Quat", "VecFwd", "VecRight", "VecUp"] {
        let (a, c) = (as_f64s(&actor[key]), as_f64s(&comp[key]));
        assert_eq!(a.len(), c.len(), "{key}");
        for (x, y) in a.iter().zip(&c) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }
    assert!(as_f64s(&comp["VecFwd"])[0] > 1e-4);

    // Generic angles: Quat is parent * relative, sign included.
    let q = (parent.quat() * relative.quat()).normalize();
    let got = as_f64s(&docs[1]["mCaptureActor"]["Component"]["Quat"]);
    for (x, y) in got.iter().zip([q.w, q.x, q.y, q.z]) {
        assert_relative_eq!(*x, y, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn palette_and_absent_area_scenario() -> Result<()> {
    let mut reg = ObjectRegistry::new();
    reg.spawn(
        "/Game/Map/AreaTexture",
        ObjectData::MapAreaTexture(MapAreaTexture {
            color_palette: vec![Color::rgb(255, 0, 0), Color::rgb(0, 255, 0)],
            color_to_area: vec![ColorAreaPair {
                map_area: None,
                min_x: 0,
                min_y: 0,
                max_x: 10,
                max_y: 10,
            }],
            ..Default::default()
        }),
    )?;

    let docs = dump_values(&reg)?;
    let d = &docs[0];
    assert_eq!(d["mColorPalette"], serde_json::json!(["#FF0000FF", "#00FF00FF"]));
    assert_eq!(
        d["mColorToArea"],
        serde_json::json!([{"MapArea": "NULL MapArea", "Min": [0, 0], "Max": [10, 10]}])
    );
    assert_eq!(d["mFogOfWarTexture"], "NULL Texture2D");
    assert_eq!(d["mCachedGameState"], "NULL GameState");
    Ok(())
}

#[test]
fn hex_prefix_can_be_disabled() -> Result<()> {
    let mut reg = ObjectRegistry::new();
    reg.spawn(
        "/Game/Map/AreaTexture",
        ObjectData::MapAreaTexture(MapAreaTexture {
            color_palette: vec![Color::new(0x12, 0x34, 0x56, 0x78)],
            ..Default::default()
        }),
    )?;
    let docs = collect_documents(&reg, DocumentOptions { hex_prefix: false });
    assert_eq!(docs[0].color_palette, vec!["12345678".to_string()]);
    Ok(())
}

#[test]
fn resolved_references_and_scalars() -> Result<()> {
    let mut reg = ObjectRegistry::new();
    let area = reg.spawn("/Game/Map/Areas.Areas:Area_7", ObjectData::MapArea)?;
    let fog = reg.spawn("/Game/Map/FogOfWar.FogOfWar", ObjectData::Texture)?;
    let gs = reg.spawn("/Game/Map/Level.Level:PersistentLevel.GameState_0", ObjectData::GameState)?;
    reg.spawn(
        "/Game/Map/AreaTexture",
        ObjectData::MapAreaTexture(MapAreaTexture {
            color_to_area: vec![ColorAreaPair {
                map_area: Some(area),
                min_x: -5,
                min_y: 3,
                max_x: 40,
                max_y: 41,
            }],
            fog_of_war_texture: Some(fog),
            cached_game_state: Some(gs),
            data_width: 512,
            upper_left_world: DVec3::new(-324600.0, -375000.0, 0.0),
            world_to_map_scale: 0.5,
            ..Default::default()
        }),
    )?;

    let d = &dump_values(&reg)?[0];
    assert_eq!(d["mFogOfWarTexture"], "/Game/Map/FogOfWar.FogOfWar");
    assert_eq!(d["mCachedGameState"], "/Game/Map/Level.Level:PersistentLevel.GameState_0");
    assert_eq!(d["mColorToArea"][0]["MapArea"], "/Game/Map/Areas.Areas:Area_7");
    assert_eq!(d["mColorToArea"][0]["Min"], serde_json::json!([-5, 3]));
    assert_eq!(d["mDataWidth"], 512);
    assert_eq!(as_f64s(&d["mUpperLeftWorld"]), vec![-324600.0, -375000.0, 0.0]);
    assert_eq!(d["mWorldToMapScale"], 0.5);
    Ok(())
}

#[test]
fn area_data_base64_roundtrip_random_blobs() -> Result<()> {
    let mut rng = oorandom::Rand32::new(0x5eed);
    for len in [0usize, 1, 2, 3, 4, 255, 4096] {
        let blob: Vec<u8> = (0..len).map(|_| rng.rand_range(0..256) as u8).collect();

        let mut reg = ObjectRegistry::new();
        reg.spawn(
            "/Game/Map/AreaTexture",
            ObjectData::MapAreaTexture(MapAreaTexture {
                area_data: blob.clone(),
                ..Default::default()
            }),
        )?;
        let docs = collect_documents(&reg, DocumentOptions::default());
        let decoded = base64::engine::general_purpose::STANDARD.decode(&docs[0].area_data)?;
        assert_eq!(decoded, blob, "len={len}");
    }
    Ok(())
}

#[test]
fn destroyed_and_other_kinds_are_not_dumped() -> Result<()> {
    let mut reg = ObjectRegistry::new();
    let a = reg.spawn("/Game/T_A", ObjectData::MapAreaTexture(MapAreaTexture::default()))?;
    reg.spawn("/Game/Area", ObjectData::MapArea)?;
    let b = reg.spawn("/Game/T_B", ObjectData::MapAreaTexture(MapAreaTexture::default()))?;
    reg.spawn("/Game/T_C", ObjectData::MapAreaTexture(MapAreaTexture::default()))?;
    assert!(reg.is_alive(a));

    // null slot, not yet collected
    assert!(reg.destroy(b));
    let docs = collect_documents(&reg, DocumentOptions::default());
    assert_eq!(docs.len(), 2);

    // after GC the slot is reused by a different kind
    reg.collect_garbage();
    reg.spawn("/Game/GS", ObjectData::GameState)?;
    let docs = collect_documents(&reg, DocumentOptions::default());
    assert_eq!(docs.len(), 2);
    Ok(())
}
