use dbvt2d::{Aabb, BroadPhase, DynamicTree, Vec2};

const NUM_STEPS: usize = 60;
const GRAVITY: f32 = -9.81;
const DT: f32 = 1.0 / 60.0;

struct Body {
    proxy_id: usize,
    position: Vec2,
    velocity: Vec2,
    half_extent: Vec2,
}

impl Body {
    fn tight_aabb(&self) -> Aabb {
        Aabb::new(
            self.position - self.half_extent,
            self.position + self.half_extent,
        )
    }
}

fn main() {
    let mut broad_phase = BroadPhase::new(DynamicTree::new());
    let mut bodies = Vec::new();

    // A row of static ground boxes.
    for i in 0..10 {
        let position = Vec2::new(i as f32, 0.0);
        let half_extent = Vec2::new(0.5, 0.5);
        let body = Body {
            proxy_id: 0,
            position,
            velocity: Vec2::ZERO,
            half_extent,
        };
        let proxy_id =
            broad_phase.create_proxy(&body.tight_aabb(), bodies.len());
        bodies.push(Body { proxy_id, ..body });
    }

    // A few falling boxes above the ground.
    for i in 0..4 {
        let position = Vec2::new(2.0 + 1.5 * i as f32, 6.0 + i as f32);
        let half_extent = Vec2::new(0.4, 0.4);
        let body = Body {
            proxy_id: 0,
            position,
            velocity: Vec2::ZERO,
            half_extent,
        };
        let proxy_id =
            broad_phase.create_proxy(&body.tight_aabb(), bodies.len());
        bodies.push(Body { proxy_id, ..body });
    }

    for step in 0..NUM_STEPS {
        // Integrate the falling boxes and push the motion into the tree.
        for body in &mut bodies {
            if body.velocity == Vec2::ZERO && body.position.y <= 0.5 {
                continue;
            }
            body.velocity.y += GRAVITY * DT;
            let displacement = body.velocity * DT;
            body.position += displacement;

            // Crude floor so the demo settles instead of falling forever.
            if body.position.y < 1.0 {
                body.position.y = 1.0;
                body.velocity = Vec2::ZERO;
            }

            broad_phase.move_proxy(
                body.proxy_id,
                &body.tight_aabb(),
                displacement,
            );
        }

        let mut pairs = Vec::new();
        broad_phase.update_pairs(|&a, &b| pairs.push((a, b)));

        if !pairs.is_empty() {
            println!("step {step:2}: {} candidate pair(s)", pairs.len());
            for (a, b) in pairs {
                println!("  bodies {a} and {b}");
            }
        }
    }

    println!(
        "tree height {}, max balance {}, area ratio {:.2}",
        broad_phase.tree.get_height(),
        broad_phase.tree.get_max_balance(),
        broad_phase.tree.get_area_ratio(),
    );
}
