// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference geometry factory built from primitives.

use core::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use plant_scene_port::{
    Color, EquipmentItem, EquipmentType, GeometryFactory, Orientation, Primitive, Shape, ShapePart,
};

const SUPERSTRUCTURE_TINT: Color = Color::from_hex(0xf5f5f5);
const FUNNEL_TINT: Color = Color::from_hex(0x37474f);
const HARDWARE_TINT: Color = Color::from_hex(0x455a64);

/// Builds every equipment kind out of boxes, cylinders and spheres.
///
/// Shapes come back centered: the body sits at the local origin and
/// attachments are offset from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveGeometryFactory;

fn boxed(width: f32, height: f32, depth: f32) -> Primitive {
    Primitive::Box {
        width,
        height,
        depth,
    }
}

fn building(w: f32, h: f32, d: f32) -> Shape {
    let mut parts = vec![ShapePart::new("body", boxed(w, h, d), Vec3::ZERO)];
    if h > w.max(d) * 1.2 {
        let rh = h * 0.2;
        parts.push(ShapePart::new(
            "rooftop",
            boxed(w * 0.6, rh, d * 0.6),
            Vec3::new(0.0, h * 0.5 + rh * 0.5, 0.0),
        ));
    } else {
        let ph = (h * 0.1).min(0.5);
        let pt = (w * 0.05).min(d * 0.05).min(0.2);
        let y = h * 0.5 + ph * 0.5;
        let front_back = boxed(w + pt * 2.0, ph, pt);
        let side = boxed(pt, ph, d);
        parts.extend([
            ShapePart::new("parapet-front", front_back, Vec3::new(0.0, y, (d + pt) * 0.5)),
            ShapePart::new("parapet-back", front_back, Vec3::new(0.0, y, -(d + pt) * 0.5)),
            ShapePart::new("parapet-left", side, Vec3::new(-(w + pt) * 0.5, y, 0.0)),
            ShapePart::new("parapet-right", side, Vec3::new((w + pt) * 0.5, y, 0.0)),
        ]);
    }
    Shape::Group(parts)
}

fn tank(radius: f32, height: f32) -> Shape {
    let roof = radius * 0.1;
    Shape::Group(vec![
        ShapePart::new("body", Primitive::Cylinder { radius, height }, Vec3::ZERO),
        ShapePart::new(
            "roof",
            Primitive::Cylinder {
                radius,
                height: roof,
            },
            Vec3::new(0.0, (height + roof) * 0.5, 0.0),
        ),
    ])
}

fn valve(radius: f32) -> Shape {
    let stem = radius * 1.2;
    Shape::Group(vec![
        ShapePart::new("body", Primitive::Sphere { radius }, Vec3::ZERO),
        ShapePart::new(
            "actuator",
            Primitive::Cylinder {
                radius: radius * 0.3,
                height: stem,
            },
            Vec3::new(0.0, radius + stem * 0.5, 0.0),
        )
        .tinted(HARDWARE_TINT),
    ])
}

fn vessel(radius: f32, height: f32, horizontal: bool) -> Shape {
    let body = Primitive::Cylinder { radius, height };
    if horizontal {
        Shape::Group(vec![
            ShapePart::new("body", body, Vec3::ZERO).rotated(Quat::from_rotation_z(FRAC_PI_2))
        ])
    } else {
        Shape::Mesh(body)
    }
}

fn pump(w: f32, h: f32, d: f32) -> Shape {
    let lying = Quat::from_rotation_x(FRAC_PI_2);
    let motor_r = w * 0.4;
    let motor_len = d * 0.5;
    let flange_r = w * 0.3;
    let flange_t = d * 0.1;
    Shape::Group(vec![
        ShapePart::new("body", boxed(w, h, d), Vec3::ZERO),
        ShapePart::new(
            "motor",
            Primitive::Cylinder {
                radius: motor_r,
                height: motor_len,
            },
            Vec3::new(0.0, h * 0.5 + motor_r * 0.2, (motor_len - d) * 0.5),
        )
        .rotated(lying),
        ShapePart::new(
            "suction-flange",
            Primitive::Cylinder {
                radius: flange_r,
                height: flange_t,
            },
            Vec3::new(0.0, 0.0, (d + flange_t) * 0.5),
        )
        .rotated(lying)
        .tinted(HARDWARE_TINT),
        ShapePart::new(
            "discharge-flange",
            Primitive::Cylinder {
                radius: flange_r * 0.8,
                height: flange_t,
            },
            Vec3::new(0.0, (h + flange_t) * 0.5, 0.0),
        )
        .tinted(HARDWARE_TINT),
    ])
}

fn ship(w: f32, h: f32, d: f32) -> Shape {
    let ss_w = w * 0.65;
    let ss_h = h * 1.3;
    let ss_d = d * 0.22;
    let ss_z = -d * 0.3;
    let funnel_h = h * 0.8;
    Shape::Group(vec![
        ShapePart::new("hull", boxed(w, h, d), Vec3::ZERO),
        ShapePart::new(
            "superstructure",
            boxed(ss_w, ss_h, ss_d),
            Vec3::new(0.0, (h + ss_h) * 0.5, ss_z),
        )
        .tinted(SUPERSTRUCTURE_TINT),
        ShapePart::new(
            "funnel",
            Primitive::Cylinder {
                radius: ss_w * 0.08,
                height: funnel_h,
            },
            Vec3::new(0.0, h * 0.5 + ss_h + funnel_h * 0.5, ss_z - ss_d * 0.2),
        )
        .tinted(FUNNEL_TINT),
    ])
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn barge(w: f32, h: f32, d: f32) -> Shape {
    let per_side = ((d / 5.0).floor() as usize + 1).max(2);
    let radius = w * 0.03;
    let height = h * 0.4;
    let x = w * 0.5 - radius * 2.0;
    let y = (h + height) * 0.5;
    let step = d * 0.8 / (per_side - 1) as f32;
    let mut parts = vec![ShapePart::new("hull", boxed(w, h, d), Vec3::ZERO)];
    for i in 0..per_side {
        let z = -d * 0.4 + step * i as f32;
        for side in [-x, x] {
            parts.push(
                ShapePart::new(
                    "bollard",
                    Primitive::Cylinder { radius, height },
                    Vec3::new(side, y, z),
                )
                .tinted(HARDWARE_TINT),
            );
        }
    }
    Shape::Group(parts)
}

impl GeometryFactory for PrimitiveGeometryFactory {
    fn build_geometry(&self, item: &EquipmentItem) -> Option<Shape> {
        let dims = item.resolved_dimensions();
        let radius = item.resolved_radius().unwrap_or(0.5);
        let height = item.resolved_height();
        let shape = match item.kind {
            EquipmentType::Terrain => return None,
            EquipmentType::Building => building(dims.width, dims.height, dims.depth),
            EquipmentType::Crane => Shape::Mesh(boxed(dims.width, dims.height, dims.depth)),
            EquipmentType::Tank => tank(radius, height),
            EquipmentType::Pipe => Shape::Mesh(Primitive::Cylinder { radius, height }),
            EquipmentType::Valve => valve(radius),
            EquipmentType::Sphere => Shape::Mesh(Primitive::Sphere { radius }),
            EquipmentType::Vessel => vessel(
                radius,
                height,
                item.orientation == Some(Orientation::Horizontal),
            ),
            EquipmentType::Pump => pump(dims.width, dims.height, dims.depth),
            EquipmentType::Ship => ship(dims.width, dims.height, dims.depth),
            EquipmentType::Barge => barge(dims.width, dims.height, dims.depth),
            EquipmentType::Other => Shape::Mesh(boxed(1.0, 1.0, 1.0)),
        };
        Some(shape)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn build(item: &EquipmentItem) -> Shape {
        PrimitiveGeometryFactory.build_geometry(item).unwrap()
    }

    #[test]
    fn terrain_builds_nothing() {
        let item = EquipmentItem::new("ground", EquipmentType::Terrain, Vec3::ZERO);
        assert!(PrimitiveGeometryFactory.build_geometry(&item).is_none());
    }

    #[test]
    fn every_body_is_centered_on_the_origin() {
        for kind in EquipmentType::ALL {
            if kind == EquipmentType::Terrain {
                continue;
            }
            let shape = build(&EquipmentItem::new("x", kind, Vec3::ZERO));
            let body = shape.body_bounds().unwrap();
            assert_relative_eq!(body.center().length(), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn defaults_apply_when_dimensions_missing() {
        let tank = build(&EquipmentItem::new("t", EquipmentType::Tank, Vec3::ZERO));
        assert_relative_eq!(tank.body_half_height(), 2.0);
        let other = build(&EquipmentItem::new("o", EquipmentType::Other, Vec3::ZERO));
        assert_eq!(other, Shape::Mesh(boxed(1.0, 1.0, 1.0)));
    }

    #[test]
    fn horizontal_vessel_lies_along_x() {
        let mut item = EquipmentItem::new("v", EquipmentType::Vessel, Vec3::ZERO);
        item.radius = Some(1.2);
        item.height = Some(6.0);
        item.orientation = Some(Orientation::Horizontal);
        let body = build(&item).body_bounds().unwrap();
        assert_relative_eq!(body.size().x, 6.0, epsilon = 1e-5);
        assert_relative_eq!(body.size().y, 2.4, epsilon = 1e-5);
    }

    #[test]
    fn tall_buildings_get_a_rooftop_and_flat_ones_a_parapet() {
        let mut tall = EquipmentItem::new("b1", EquipmentType::Building, Vec3::ZERO);
        tall.size = Some(plant_scene_port::Dimensions::new(10.0, 15.0, 8.0));
        assert_eq!(build(&tall).mesh_count(), 2);

        let mut flat = tall.clone();
        flat.size = Some(plant_scene_port::Dimensions::new(20.0, 8.0, 15.0));
        assert_eq!(build(&flat).mesh_count(), 5);
    }
}
