//! Complete workflow demonstration for rust_voronoi_fracture
//!
//! Run with `RUST_LOG=debug` to see the fracture log.

use rust_voronoi_fracture::*;
use rust_voronoi_fracture::mesh::primitives;

/// Host-side sink standing in for a game engine's scene
#[derive(Default)]
struct Scene {
    spawned: Vec<Fragment<&'static str>>,
    destroyed: Vec<u64>,
}

impl FragmentSink<&'static str> for Scene {
    fn spawn(&mut self, fragment: Fragment<&'static str>) {
        self.spawned.push(fragment);
    }

    fn destroy_source(&mut self, source: &FractureSource<&'static str>) {
        self.destroyed.push(source.id);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== rust_voronoi_fracture Complete Demo ===\n");

    // Step 1: Configure the fracture service
    println!("Step 1: Configuring fracture...");
    let config = FractureConfigBuilder::new()
        .shard_count(12)?
        .fracture_radius(1.0)?
        .explosion_force(350.0)?
        .seed(12345)
        .build()?;
    println!("  Shards: {}", config.shard_count);
    println!("  Radius: {}", config.fracture_radius);
    let shatter = VoronoiShatter::new(config);

    // Step 2: Describe the object being hit
    println!("\nStep 2: Building source...");
    let transform = Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))
        .with_rotation(Quat::from_rotation_y(0.4))
        .with_scale(Vec3::splat(1.5));
    let source = FractureSource::new(7, "Crate", primitives::cuboid(Vec3::new(1.0, 0.5, 0.75)), "wood")
        .with_tag("Destructible")
        .with_transform(transform);
    println!("  Vertices: {}", source.mesh.vertex_count());
    println!("  Triangles: {}", source.mesh.triangle_count());

    // Step 3: Fracture at a point on the surface
    println!("\nStep 3: Fracturing...");
    let impact = source.world_matrix.transform_point3(Vec3::new(1.0, 0.2, 0.1));
    let mut scene = Scene::default();
    let report = shatter.trigger_fracture(&source, impact, &mut scene)?;
    println!("  Seeds: {}", report.seeds_planned);
    println!("  Cuts: {}", report.cuts_performed);
    println!("  Shards: {}", report.shards_spawned);
    println!("  Rejected: {}", report.fragments_rejected);
    println!("  Core: {}", report.core_spawned);
    println!("  Source destroyed: {:?}", scene.destroyed);

    // Step 4: Inspect fragments
    println!("\nStep 4: Fragments:");
    let mut total_triangles = 0;
    for fragment in &scene.spawned {
        let collider = match &fragment.collider {
            ColliderShape::ConvexHull(hull) => format!("hull ({} points)", hull.vertices.len()),
            ColliderShape::Box(cuboid) => format!("box {:?}", cuboid.half_extents),
        };
        total_triangles += fragment.mesh.triangle_count();
        println!(
            "  {:<9} {:>4} tris  mass {:>5.2}  {}",
            fragment.label,
            fragment.mesh.triangle_count(),
            fragment.body.mass,
            collider
        );
    }

    // Memory estimate of the exported mesh data
    let mem: usize = scene
        .spawned
        .iter()
        .map(|f| {
            let data = f.mesh.to_mesh_data();
            data.positions.len() * 12 + data.normals.len() * 12 + data.uvs.len() * 8 + data.indices.len() * 4
        })
        .sum();
    println!("\n  Total triangles: {}", total_triangles);
    println!("  Memory: {:.2} KB", mem as f32 / 1024.0);

    // Step 5: Fragments refuse to break again
    if let Some(first) = scene.spawned.first() {
        let again = first.as_source(100, Affine3A::IDENTITY);
        match shatter.shatter(&again, impact) {
            Err(err) => println!("\nStep 5: Re-fracture refused: {}", err),
            Ok(_) => println!("\nStep 5: Unexpected re-fracture"),
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
