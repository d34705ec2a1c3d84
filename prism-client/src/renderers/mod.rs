pub mod triangle_renderer;
pub use triangle_renderer::TriangleRenderer;
