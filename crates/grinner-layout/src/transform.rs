use grinner_core::Point;
use grinner_core::point::rotate_vec;

use crate::curve::Placement;
use crate::error::{ApplyError, HostError};

/// A switch footprint owned by the host document.
pub trait Footprint {
    fn reference(&self) -> &str;

    /// Board position of the footprint origin, in mm.
    fn position(&self) -> [f64; 2];

    /// Current rotation in degrees.
    fn rotation(&self) -> f64;

    fn set_position(&mut self, position: [f64; 2]) -> Result<(), HostError>;

    fn set_rotation(&mut self, rotation_deg: f64) -> Result<(), HostError>;

    /// Offset of the footprint origin from the key center in the unrotated
    /// footprint frame.
    fn key_center_offset(&self) -> [f64; 2] {
        [0.0, 0.0]
    }

    fn field(&self, name: &str) -> Option<String>;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), HostError>;
}

impl<T: Footprint + ?Sized> Footprint for &mut T {
    fn reference(&self) -> &str {
        (**self).reference()
    }

    fn position(&self) -> [f64; 2] {
        (**self).position()
    }

    fn rotation(&self) -> f64 {
        (**self).rotation()
    }

    fn set_position(&mut self, position: [f64; 2]) -> Result<(), HostError> {
        (**self).set_position(position)
    }

    fn set_rotation(&mut self, rotation_deg: f64) -> Result<(), HostError> {
        (**self).set_rotation(rotation_deg)
    }

    fn key_center_offset(&self) -> [f64; 2] {
        (**self).key_center_offset()
    }

    fn field(&self, name: &str) -> Option<String> {
        (**self).field(name)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), HostError> {
        (**self).set_field(name, value)
    }
}

/// Where placement coordinates land on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// Keep the first key's center where it currently is.
    FirstKey,
    /// Board point corresponding to the placement origin.
    Absolute([f64; 2]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyReport {
    pub updated: usize,
    /// Board offset added to every placement.
    pub translation: [f64; 2],
}

/// Board pose of the key center and of the footprint origin for one
/// placement.
#[must_use]
pub fn footprint_pose(placement: &Placement, translation: [f64; 2], offset: [f64; 2]) -> Point {
    let mut center = Point::new(
        placement.x_mm + translation[0],
        placement.y_mm + translation[1],
        placement.rotation_deg,
    );
    center.shift(offset, true);
    center
}

/// Move and rotate `footprints` onto `placements`, pairwise in order.
///
/// Each footprint turns about its key center. A host failure stops the loop;
/// footprints before it keep their new pose and the error says how many.
pub fn apply<F: Footprint>(
    placements: &[Placement],
    footprints: &mut [F],
    origin: Origin,
) -> Result<ApplyReport, ApplyError> {
    if placements.len() != footprints.len() {
        return Err(ApplyError::CountMismatch {
            placements: placements.len(),
            footprints: footprints.len(),
        });
    }
    let (Some(first_placement), Some(first_fp)) = (placements.first(), footprints.first()) else {
        return Ok(ApplyReport {
            updated: 0,
            translation: [0.0, 0.0],
        });
    };

    let translation = match origin {
        Origin::Absolute(at) => at,
        Origin::FirstKey => {
            let center = current_center(first_fp);
            [
                center[0] - first_placement.x_mm,
                center[1] - first_placement.y_mm,
            ]
        }
    };

    let total = footprints.len();
    for (updated, (placement, fp)) in placements.iter().zip(footprints.iter_mut()).enumerate() {
        let pose = footprint_pose(placement, translation, fp.key_center_offset());
        let result = fp
            .set_position(pose.coords())
            .and_then(|()| fp.set_rotation(pose.r));
        if let Err(source) = result {
            return Err(ApplyError::Partial {
                updated,
                total,
                reference: fp.reference().to_string(),
                source,
            });
        }
        tracing::trace!(reference = fp.reference(), x = pose.x, y = pose.y, r = pose.r, "placed");
    }

    Ok(ApplyReport {
        updated: total,
        translation,
    })
}

fn current_center<F: Footprint>(fp: &F) -> [f64; 2] {
    let offset = rotate_vec(fp.key_center_offset(), fp.rotation());
    let pos = fp.position();
    [pos[0] - offset[0], pos[1] - offset[1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Role;
    use approx::assert_abs_diff_eq;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    struct Fake {
        reference: String,
        pos: [f64; 2],
        rot: f64,
        offset: [f64; 2],
        fields: HashMap<String, String>,
        locked: bool,
    }

    impl Footprint for Fake {
        fn reference(&self) -> &str {
            &self.reference
        }
        fn position(&self) -> [f64; 2] {
            self.pos
        }
        fn rotation(&self) -> f64 {
            self.rot
        }
        fn set_position(&mut self, position: [f64; 2]) -> Result<(), HostError> {
            if self.locked {
                return Err("footprint is locked".into());
            }
            self.pos = position;
            Ok(())
        }
        fn set_rotation(&mut self, rotation_deg: f64) -> Result<(), HostError> {
            self.rot = rotation_deg;
            Ok(())
        }
        fn key_center_offset(&self) -> [f64; 2] {
            self.offset
        }
        fn field(&self, name: &str) -> Option<String> {
            self.fields.get(name).cloned()
        }
        fn set_field(&mut self, name: &str, value: &str) -> Result<(), HostError> {
            self.fields.insert(name.to_string(), value.to_string());
            Ok(())
        }
    }

    fn fake(reference: &str, pos: [f64; 2]) -> Fake {
        Fake {
            reference: reference.to_string(),
            pos,
            ..Fake::default()
        }
    }

    fn placement(index: usize, x: f64, y: f64, r: f64) -> Placement {
        Placement {
            index,
            role: Role::Curved,
            x_mm: x,
            y_mm: y,
            rotation_deg: r,
        }
    }

    #[test]
    fn anchors_first_key_on_its_current_position() {
        let placements = [placement(0, 9.525, 0.0, 0.0), placement(1, 28.575, 2.0, -10.0)];
        let mut fps = vec![fake("SW1", [100.0, 50.0]), fake("SW2", [0.0, 0.0])];
        let report = apply(&placements, &mut fps, Origin::FirstKey).unwrap();
        assert_eq!(report.updated, 2);
        assert_abs_diff_eq!(fps[0].pos[0], 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fps[0].pos[1], 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fps[1].pos[0], 119.05, epsilon = 1e-9);
        assert_abs_diff_eq!(fps[1].pos[1], 52.0, epsilon = 1e-9);
        assert_eq!(fps[1].rot, -10.0);
    }

    #[test]
    fn rotates_about_key_center() {
        let placements = [placement(0, 0.0, 0.0, 90.0)];
        let mut fps = vec![Fake {
            offset: [5.0, 0.0],
            ..fake("SW1", [0.0, 0.0])
        }];
        apply(&placements, &mut fps, Origin::Absolute([10.0, 10.0])).unwrap();
        assert_abs_diff_eq!(fps[0].pos[0], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fps[0].pos[1], 15.0, epsilon = 1e-9);
        assert_eq!(fps[0].rot, 90.0);
    }

    #[test]
    fn reports_partial_application() {
        let placements = [
            placement(0, 0.0, 0.0, 0.0),
            placement(1, 19.05, 0.0, 0.0),
            placement(2, 38.1, 0.0, 0.0),
        ];
        let mut fps = vec![
            fake("SW1", [0.0, 0.0]),
            Fake {
                locked: true,
                ..fake("SW2", [1.0, 1.0])
            },
            fake("SW3", [2.0, 2.0]),
        ];
        let err = apply(&placements, &mut fps, Origin::Absolute([0.0, 0.0])).unwrap_err();
        match &err {
            ApplyError::Partial {
                updated,
                total,
                reference,
                ..
            } => {
                assert_eq!((*updated, *total), (1, 3));
                assert_eq!(reference, "SW2");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("1 of 3 footprints updated"));
        assert_eq!(fps[2].pos, [2.0, 2.0]);
    }

    #[test]
    fn rejects_count_mismatch_before_mutating() {
        let placements = [placement(0, 0.0, 0.0, 0.0)];
        let mut fps = vec![fake("SW1", [3.0, 4.0]), fake("SW2", [5.0, 6.0])];
        assert!(matches!(
            apply(&placements, &mut fps, Origin::FirstKey),
            Err(ApplyError::CountMismatch { .. })
        ));
        assert_eq!(fps[0].pos, [3.0, 4.0]);
    }

    #[test]
    fn works_through_mutable_references() {
        let placements = [placement(0, 0.0, 0.0, 5.0)];
        let mut owned = fake("SW1", [1.0, 2.0]);
        let mut refs = vec![&mut owned];
        apply(&placements, &mut refs, Origin::FirstKey).unwrap();
        assert_eq!(owned.rot, 5.0);
        assert_eq!(owned.pos, [1.0, 2.0]);
    }
}
