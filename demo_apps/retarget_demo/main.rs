use followme::prelude::*;
use glam::EulerRot;

/// `(bone, parent, offset)` of the demo skeleton. Node names are prefixed
/// per avatar, so the two rigs share human names but not bone names.
const SKELETON: &[(&str, &str, [f32; 3])] = &[
    ("Hips", "", [0.0, 1.0, 0.0]),
    ("Spine", "Hips", [0.0, 0.12, 0.0]),
    ("Chest", "Spine", [0.0, 0.15, 0.0]),
    ("Neck", "Chest", [0.0, 0.25, 0.0]),
    ("Head", "Neck", [0.0, 0.1, 0.0]),
    ("LeftUpperArm", "Chest", [0.18, 0.2, 0.0]),
    ("LeftLowerArm", "LeftUpperArm", [0.28, 0.0, 0.0]),
    ("LeftHand", "LeftLowerArm", [0.25, 0.0, 0.0]),
    ("Left Index Proximal", "LeftHand", [0.08, 0.0, 0.02]),
    ("RightUpperArm", "Chest", [-0.18, 0.2, 0.0]),
    ("RightLowerArm", "RightUpperArm", [-0.28, 0.0, 0.0]),
    ("RightHand", "RightLowerArm", [-0.25, 0.0, 0.0]),
    ("LeftUpperLeg", "Hips", [0.1, -0.05, 0.0]),
    ("LeftLowerLeg", "LeftUpperLeg", [0.0, -0.45, 0.0]),
    ("LeftFoot", "LeftLowerLeg", [0.0, -0.45, 0.0]),
    ("RightUpperLeg", "Hips", [-0.1, -0.05, 0.0]),
    ("RightLowerLeg", "RightUpperLeg", [0.0, -0.45, 0.0]),
    ("RightFoot", "RightLowerLeg", [0.0, -0.45, 0.0]),
];

const CONFIG: &str = r#"{
    "blend_shape_scale": 1.0,
    "blend_shape_mappings": [
        {
            "name": "Face",
            "mappings": [
                {
                    "source_blend_shape_name": "Smile",
                    "target_blend_shape_names": ["Mouth_Smile_L", "Mouth_Smile_R"],
                    "target_blend_shape_weights": [1.0, 1.0]
                },
                {
                    "source_blend_shape_name": "JawOpen",
                    "target_blend_shape_names": ["Mouth_Open"],
                    "target_blend_shape_weights": [0.8]
                }
            ]
        }
    ],
    "blend_shape_to_bones": [
        {
            "name": "Nod",
            "enabled": true,
            "bone_name": "B_Head",
            "settings": [
                { "blend_shape_name": "Mouth_Open", "sensitivity": 15.0, "axis": "X" }
            ]
        }
    ]
}"#;

fn build_avatar(
    scene: &mut Scene,
    name: &str,
    prefix: &str,
    scale: f32,
    channels: &[&str],
) -> (NodeHandle, AvatarSetting) {
    let root = scene.create_node_with_name(name);
    let mut template = HumanDescription::default();

    for &(bone, parent, offset) in SKELETON {
        let parent = if parent.is_empty() {
            Some(root)
        } else {
            scene.find_by_name(root, &format!("{prefix}{parent}"))
        };
        let Some(parent) = parent else {
            log::error!("Parent of {bone} missing from the demo skeleton");
            continue;
        };
        let node_name = format!("{prefix}{bone}");
        scene.spawn_child(parent, &node_name, Vec3::from(offset) * scale);
        template.human.push(HumanBoneMapping {
            human_name: bone.to_string(),
            bone_name: node_name,
        });
    }

    let body = scene.spawn_child(root, "Body", Vec3::ZERO);
    scene.set_mesh(body, BlendShapeSet::from_names(channels.iter().copied()));

    let mut setting = AvatarSetting {
        body_name: "Body".to_string(),
        template: Some(template),
        ..Default::default()
    };
    let bones = reset_avatar(scene, root, &mut setting);
    log::info!("Avatar '{name}': {bones} human bones captured");
    (root, setting)
}

/// Source animation at time `t` (seconds): a walk-like swing plus a smile.
fn animate(scene: &mut Scene, root: NodeHandle, t: f32) {
    let swing = (t * std::f32::consts::TAU).sin();
    let pose = [
        ("LeftUpperArm", Quat::from_euler(EulerRot::XYZ, swing * 0.6, 0.0, -1.2)),
        ("RightUpperArm", Quat::from_euler(EulerRot::XYZ, -swing * 0.6, 0.0, 1.2)),
        ("LeftUpperLeg", Quat::from_rotation_x(-swing * 0.5)),
        ("RightUpperLeg", Quat::from_rotation_x(swing * 0.5)),
        ("Spine", Quat::from_rotation_y(swing * 0.1)),
        ("Left Index Proximal", Quat::from_rotation_z(-0.4 * swing.abs())),
    ];
    for (bone, rotation) in pose {
        if let Some(node) = scene.find_by_name(root, bone) {
            scene.set_rotation(node, rotation);
        }
    }
    scene.set_world_position(root, Vec3::new(0.0, 0.0, t * 1.2));

    if let Some(body) = scene.find_by_name(root, "Body")
        && let Some(mesh) = scene.get_mesh_mut(body)
    {
        mesh.set_weight_by_name("Smile", 0.5 + 0.5 * swing);
        mesh.set_weight_by_name("JawOpen", swing.abs());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = Scene::new();
    let (source_root, source) = build_avatar(&mut scene, "Source", "", 1.0, &["Smile", "JawOpen"]);
    let (target_root, target) = build_avatar(
        &mut scene,
        "Target",
        "B_",
        0.75,
        &["Mouth_Smile_L", "Mouth_Smile_R", "Mouth_Open"],
    );

    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {path}");
            RetargetConfig::load(path)?
        }
        None => RetargetConfig::from_json_str(CONFIG)?,
    };
    config.source = source;
    config.target = target;

    let mut retarget = AvatarRetarget::new(source_root, target_root, config);
    retarget.reset(&scene);

    let target_hips = scene.find_by_name(target_root, "B_Hips");
    let target_finger = scene.find_by_name(target_root, "B_Left Index Proximal");
    for frame in 0..10u16 {
        let t = f32::from(frame) / 10.0;
        animate(&mut scene, source_root, t);

        let stats = retarget.update(&mut scene);
        let hips = target_hips.and_then(|h| scene.world_position(h));
        let finger = target_finger
            .and_then(|f| scene.local_euler_degrees(f))
            .unwrap_or_default();
        let weights = retarget
            .target
            .body()
            .and_then(|b| scene.get_mesh(b))
            .map(|m| m.weights().to_vec())
            .unwrap_or_default();

        log::info!(
            "frame {frame}: skeleton={} channels={} bones={} hips={hips:?} finger={finger:?} weights={weights:?}",
            stats.skeleton,
            stats.channels_written,
            stats.bones_driven,
        );
    }

    Ok(())
}
