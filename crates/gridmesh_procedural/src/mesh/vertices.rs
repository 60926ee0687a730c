//! Vertex positions and height sampling.

use gridmesh_core::{GridSpec, ScanCell};

use crate::descriptor::{HeightSource, MeshDescriptor};
use crate::mesh::elements::Vector3;

/// Computes vertex positions from a descriptor.
///
/// Every vertex depends only on the descriptor, never on other vertices.
#[derive(Clone, Copy)]
pub(crate) struct VertexSampler<'a> {
    grid: &'a GridSpec,
    height: Option<&'a HeightSource>,
}

impl<'a> VertexSampler<'a> {
    pub(crate) fn new(descriptor: &'a MeshDescriptor) -> Self {
        Self {
            grid: &descriptor.grid,
            height: descriptor.height.as_ref(),
        }
    }

    /// Elevation of a vertex-grid cell.
    ///
    /// 0 without a height source, and 0 when the field has no sample there.
    fn elevation(&self, cell: ScanCell) -> f64 {
        let Some(source) = self.height else {
            return 0.0;
        };
        source.height_input(cell.fractional).map_or(0.0, |input| {
            source
                .strategy
                .elevation(input, source.height_scale, cell.location, cell.fractional)
        })
    }

    /// Position of a vertex-grid cell: `(col * w, row * h, elevation)`.
    ///
    /// The grid's base elevation is left to consumers.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn position(&self, cell: ScanCell) -> Vector3 {
        let x = f64::from(cell.location.column) * self.grid.cell_width();
        let y = f64::from(cell.location.row) * self.grid.cell_height();
        let z = self.elevation(cell);
        Vector3::new(x as f32, y as f32, z as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HeightStrategy;
    use crate::field::HeightField;

    fn cell(spec: &GridSpec, index: usize) -> ScanCell {
        spec.vertex_grid().cell_at(index).unwrap()
    }

    #[test]
    fn test_flat_without_height_source() {
        let spec = GridSpec::new(2, 2).unwrap().with_cell_size(1.5, 0.5).unwrap();
        let descriptor = MeshDescriptor::new(spec);
        let sampler = VertexSampler::new(&descriptor);

        // Vertex 5 of a 3x3 vertex grid is (2, 1)
        assert_eq!(sampler.position(cell(&spec, 5)), Vector3::new(3.0, 0.5, 0.0));
    }

    #[test]
    fn test_base_elevation_does_not_move_vertices() {
        let spec = GridSpec::new(1, 1).unwrap().with_base_elevation(4.0);
        let flat = MeshDescriptor::new(spec);
        let raised = MeshDescriptor::new(spec)
            .with_height(HeightSource::new().with_strategy(HeightStrategy::custom(|_, _, _| 1.0)));
        for index in 0..4 {
            assert_eq!(VertexSampler::new(&flat).position(cell(&spec, index)).z, 0.0);
            let z = VertexSampler::new(&raised).position(cell(&spec, index)).z;
            assert!((z - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_strategy_without_field_gets_zero_input() {
        let spec = GridSpec::new(3, 3).unwrap();
        let descriptor = MeshDescriptor::new(spec).with_height(
            HeightSource::new().with_strategy(HeightStrategy::custom(|v, _, _| v + 2.0)),
        );
        let sampler = VertexSampler::new(&descriptor);
        assert!((sampler.position(cell(&spec, 7)).z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_strategy_uses_inverted_red() {
        let spec = GridSpec::new(2, 2).unwrap();
        let descriptor = MeshDescriptor::new(spec).with_height(
            HeightSource::new()
                .with_field(HeightField::constant(0.25))
                .with_height_scale(8.0)
                .with_strategy(HeightStrategy::Scaled),
        );
        let sampler = VertexSampler::new(&descriptor);
        // (1 - 0.25) * 8
        assert!((sampler.position(cell(&spec, 4)).z - 6.0).abs() < 1e-6);
    }
}
