//! Scene extraction: turn a generated world into render primitives.
//!
//! Tiles become unit boxes scaled to their height. Decorations become small
//! boxes standing on their tile. The bridge gets a deck slab reaching onto
//! both banks. Primitive ids are assigned in order: tiles (row-major),
//! decorations, then the deck.

use glam::{Mat4, Quat, Vec3};
use tessera_world::{
    Bridge, ColorClass, Decoration, DecorationKind, GridCoord, TileRecord, TileType, World,
    WorldCoord,
};

use crate::batcher::{PrimitiveClass, PrimitiveId, RenderPrimitive};
use crate::material::MaterialKey;
use crate::mesh::MeshData;

const CRYSTAL_GLOW: f32 = 0.6;
const DECK_THICKNESS: f32 = 0.08;
const DECK_WIDTH: f32 = 0.8;

/// Footprint width and height of a decoration kind, in tiles.
fn decoration_size(kind: DecorationKind) -> (f32, f32) {
    match kind {
        DecorationKind::Flower => (0.15, 0.2),
        DecorationKind::TallGrass => (0.2, 0.35),
        DecorationKind::Bush => (0.45, 0.35),
        DecorationKind::OakTree => (0.5, 1.6),
        DecorationKind::PineTree => (0.4, 1.9),
        DecorationKind::Mushroom => (0.15, 0.15),
        DecorationKind::Cactus => (0.25, 1.2),
        DecorationKind::DryShrub => (0.3, 0.2),
        DecorationKind::Sandstone => (0.5, 0.4),
        DecorationKind::Boulder => (0.6, 0.45),
        DecorationKind::Crystal => (0.25, 0.6),
    }
}

fn decoration_color(kind: DecorationKind) -> u32 {
    match kind {
        DecorationKind::Flower => 0xe8_6a_9a,
        DecorationKind::TallGrass => 0x8f_c8_5a,
        DecorationKind::Bush => 0x4e_8f_3c,
        DecorationKind::OakTree => 0x3a_7a_2e,
        DecorationKind::PineTree => 0x25_5e_33,
        DecorationKind::Mushroom => 0xc4_3b_2f,
        DecorationKind::Cactus => 0x5a_8f_3d,
        DecorationKind::DryShrub => 0xa8_92_5a,
        DecorationKind::Sandstone => 0xc9_a2_6b,
        DecorationKind::Boulder => 0x7d_78_72,
        DecorationKind::Crystal => 0x9f_7f_e0,
    }
}

fn world_position(coord: WorldCoord) -> Vec3 {
    Vec3::new(coord.x as f32, 0.0, coord.z as f32)
}

fn tile_primitive(id: PrimitiveId, world: &World, tile: &TileRecord, cube: &MeshData) -> RenderPrimitive {
    let center = world_position(world.grid().dims().to_world(tile.coord));
    let transform = Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, tile.height, 1.0),
        Quat::IDENTITY,
        center + Vec3::Y * (tile.height * 0.5),
    );
    let class = if tile.tile_type == TileType::Water {
        PrimitiveClass::Water
    } else {
        PrimitiveClass::Static
    };
    RenderPrimitive {
        id,
        mesh: cube.clone(),
        transform,
        material: MaterialKey::solid(tile.color.rgb(), false, true),
        class,
    }
}

fn decoration_primitive(
    id: PrimitiveId,
    world: &World,
    decoration: &Decoration,
    cube: &MeshData,
) -> RenderPrimitive {
    let (width, height) = decoration_size(decoration.kind);
    let height = height * (1.0 + 0.1 * f32::from(decoration.variant));
    let ground = world.height_at(decoration.anchor.x as f32, decoration.anchor.z as f32);
    let base = world_position(decoration.anchor)
        + Vec3::new(decoration.offset[0], ground, decoration.offset[1]);
    let transform = Mat4::from_scale_rotation_translation(
        Vec3::new(width, height, width),
        Quat::IDENTITY,
        base + Vec3::Y * (height * 0.5),
    );

    let color = decoration_color(decoration.kind);
    let mut material = MaterialKey::solid(color, true, true);
    if decoration.kind.is_emissive() {
        material = material.with_emissive(color, CRYSTAL_GLOW);
    }
    let class = if decoration.kind == DecorationKind::TallGrass {
        PrimitiveClass::Animated
    } else {
        PrimitiveClass::Static
    };
    RenderPrimitive {
        id,
        mesh: cube.clone(),
        transform,
        material,
        class,
    }
}

fn deck_primitive(id: PrimitiveId, world: &World, bridge: Bridge, cube: &MeshData) -> RenderPrimitive {
    let dims = world.grid().dims();
    let deck_top = world.grid().tile(GridCoord::new(bridge.min_col, bridge.row)).height;
    let left = world_position(dims.to_world(GridCoord::new(bridge.min_col, bridge.row)));
    let center_x = left.x + bridge.span() as f32 * 0.5;
    let transform = Mat4::from_scale_rotation_translation(
        Vec3::new(bridge.deck_length() as f32, DECK_THICKNESS, DECK_WIDTH),
        Quat::IDENTITY,
        Vec3::new(center_x, deck_top + DECK_THICKNESS * 0.5, left.z),
    );
    RenderPrimitive {
        id,
        mesh: cube.clone(),
        transform,
        material: MaterialKey::solid(ColorClass::Plank.rgb(), true, true),
        class: PrimitiveClass::Static,
    }
}

/// Build render primitives for every tile and decoration of `world`, plus the bridge deck.
pub fn extract_scene(world: &World) -> Vec<RenderPrimitive> {
    let cube = MeshData::unit_cube();
    let tiles = world.grid().tiles();
    let decorations = world.decorations();
    let mut primitives = Vec::with_capacity(tiles.len() + decorations.len() + 1);

    let mut next_id: PrimitiveId = 0;
    for tile in tiles {
        primitives.push(tile_primitive(next_id, world, tile, &cube));
        next_id += 1;
    }
    for decoration in decorations {
        primitives.push(decoration_primitive(next_id, world, decoration, &cube));
        next_id += 1;
    }
    if let Some(bridge) = world.grid().bridge() {
        primitives.push(deck_primitive(next_id, world, bridge, &cube));
    }
    primitives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batcher::batch_static;
    use tessera_config::Config;

    fn world(seed: u64) -> World {
        let mut config = Config::default();
        config.world.seed = Some(seed);
        let mut world = World::generate(&config).unwrap();
        world.scatter_decorations().unwrap();
        world
    }

    #[test]
    fn test_one_primitive_per_tile_and_decoration() {
        let world = world(3);
        let scene = extract_scene(&world);
        let decks = usize::from(world.grid().bridge().is_some());
        assert_eq!(scene.len(), 784 + world.decorations().len() + decks);
        for (i, primitive) in scene.iter().enumerate() {
            assert_eq!(primitive.id as usize, i);
        }
    }

    #[test]
    fn test_water_tiles_flagged() {
        let world = world(4);
        let scene = extract_scene(&world);
        let water = scene
            .iter()
            .filter(|p| p.class == PrimitiveClass::Water)
            .count();
        let water_tiles = world
            .grid()
            .tiles()
            .iter()
            .filter(|t| t.tile_type == TileType::Water)
            .count();
        assert_eq!(water, water_tiles);
        assert!(water > 0);
    }

    #[test]
    fn test_tiles_receive_but_do_not_cast() {
        let world = world(5);
        let scene = extract_scene(&world);
        for primitive in &scene[..784] {
            assert!(!primitive.material.cast_shadow);
            assert!(primitive.material.receive_shadow);
        }
    }

    #[test]
    fn test_tile_box_height_matches_tile() {
        let world = world(6);
        let scene = extract_scene(&world);
        let tile = &world.grid().tiles()[100];
        let baked = scene[100].mesh.baked(&scene[100].transform);
        let top = baked
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert!((top - tile.height).abs() < 1e-5);
    }

    #[test]
    fn test_deck_spans_river_and_banks() {
        let world = world(7);
        let bridge = world.grid().bridge().expect("full-length river always gets a bridge");
        let scene = extract_scene(&world);
        let deck = scene.last().unwrap();
        let baked = deck.mesh.baked(&deck.transform);
        let (min_x, max_x) = baked
            .vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v.position[0]), hi.max(v.position[0])));
        assert!((max_x - min_x - bridge.deck_length() as f32).abs() < 1e-4);

        // The deck covers both bank tiles flanking the water.
        let dims = world.grid().dims();
        let left_bank = dims.to_world(GridCoord::new(bridge.min_col - 1, bridge.row));
        let right_bank = dims.to_world(GridCoord::new(bridge.max_col + 1, bridge.row));
        assert!(min_x <= left_bank.x as f32 && max_x >= right_bank.x as f32);
        assert_eq!(deck.class, PrimitiveClass::Static);
    }

    #[test]
    fn test_crystals_emissive() {
        for seed in 0..8 {
            let world = world(seed);
            let scene = extract_scene(&world);
            for (primitive, decoration) in scene[784..].iter().zip(world.decorations()) {
                assert_eq!(
                    primitive.material.is_emissive(),
                    decoration.kind == DecorationKind::Crystal
                );
            }
        }
    }

    #[test]
    fn test_world_scene_batches_conserve_geometry() {
        let world = world(9);
        let set = batch_static(extract_scene(&world));
        let stats = set.stats();
        assert_eq!(stats.vertices_original, stats.vertices_batched);
        assert!(stats.draws_batched < stats.draws_original);
    }
}
