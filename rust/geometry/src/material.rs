// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dominant material color
//!
//! A .bim mesh carries a single color, while tessellated IFC geometry may
//! assign a different material to every triangle. The material covering the
//! most triangles wins.

use crate::error::{Error, Result};
use dotbim_ifc_core::Color;

/// Surface material as reported by the tessellator
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    pub name: String,
    /// Diffuse RGB in [0, 1]
    pub diffuse: Option<[f64; 3]>,
    /// Transparency in [0, 1]
    pub transparency: Option<f64>,
}

impl SurfaceMaterial {
    pub fn new(name: impl Into<String>, diffuse: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            diffuse: Some(diffuse),
            transparency: None,
        }
    }

    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Byte color for this material, if it has a diffuse component
    pub fn color(&self) -> Option<Color> {
        let [r, g, b] = self.diffuse?;
        let alpha = match self.transparency {
            Some(t) if t > 0.0 => 1.0 - t,
            _ => 1.0,
        };
        Some(Color::new(
            unit_to_byte(r),
            unit_to_byte(g),
            unit_to_byte(b),
            unit_to_byte(alpha),
        ))
    }
}

/// Scale a [0, 1] channel to a byte, truncating
#[inline]
fn unit_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Index of the material assigned to the most faces.
///
/// Ties go to the lowest material index. Returns `None` when there are no
/// face assignments.
pub fn dominant_material(material_ids: &[i32], material_count: usize) -> Result<Option<usize>> {
    let mut tally = vec![0usize; material_count];
    for &id in material_ids {
        let slot = usize::try_from(id)
            .ok()
            .and_then(|i| tally.get_mut(i))
            .ok_or(Error::MaterialIndexOutOfRange {
                index: id,
                count: material_count,
            })?;
        *slot += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    for (index, &count) in tally.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((index, count)),
        }
    }
    Ok(best.map(|(index, _)| index))
}

/// Default color for a mesh: the dominant material's color, or opaque white
/// when there are no materials or the winner has no diffuse color.
pub fn resolve_mesh_color(materials: &[SurfaceMaterial], material_ids: &[i32]) -> Result<Color> {
    if materials.is_empty() {
        return Ok(Color::WHITE);
    }
    let color = dominant_material(material_ids, materials.len())?
        .and_then(|index| materials[index].color())
        .unwrap_or(Color::WHITE);
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<SurfaceMaterial> {
        vec![
            SurfaceMaterial::new("Concrete", [0.5, 0.5, 0.5]),
            SurfaceMaterial::new("Glass", [0.0, 0.4, 1.0]).with_transparency(0.6),
            SurfaceMaterial::new("Steel", [0.2, 0.2, 0.25]),
        ]
    }

    #[test]
    fn test_most_faces_wins() {
        let ids = [0, 1, 1, 2, 1];
        assert_eq!(dominant_material(&ids, 3).unwrap(), Some(1));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let ids = [2, 2, 0, 0, 1];
        assert_eq!(dominant_material(&ids, 3).unwrap(), Some(0));
    }

    #[test]
    fn test_no_assignments() {
        assert_eq!(dominant_material(&[], 3).unwrap(), None);
    }

    #[test]
    fn test_out_of_range_is_fatal() {
        assert!(matches!(
            dominant_material(&[0, 3], 3),
            Err(Error::MaterialIndexOutOfRange { index: 3, count: 3 })
        ));
        assert!(matches!(
            dominant_material(&[-1], 3),
            Err(Error::MaterialIndexOutOfRange { index: -1, .. })
        ));
    }

    #[test]
    fn test_transparency_becomes_alpha() {
        let color = palette()[1].color().unwrap();
        assert_eq!(color, Color::new(0, 102, 255, 102));

        let opaque = palette()[0].color().unwrap();
        assert_eq!(opaque, Color::new(127, 127, 127, 255));
    }

    #[test]
    fn test_resolve_mesh_color() {
        let materials = palette();
        assert_eq!(
            resolve_mesh_color(&materials, &[1, 1, 0]).unwrap(),
            Color::new(0, 102, 255, 102)
        );
        assert_eq!(resolve_mesh_color(&[], &[5, 6]).unwrap(), Color::WHITE);
        assert_eq!(resolve_mesh_color(&materials, &[]).unwrap(), Color::WHITE);
    }

    #[test]
    fn test_winner_without_diffuse_falls_back_to_white() {
        let materials = vec![SurfaceMaterial {
            name: "Unstyled".to_string(),
            diffuse: None,
            transparency: None,
        }];
        assert_eq!(resolve_mesh_color(&materials, &[0, 0]).unwrap(), Color::WHITE);
    }
}
