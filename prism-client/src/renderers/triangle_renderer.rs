use bytemuck::offset_of;
use glow::HasContext;
use std::mem;
use vek::Vec3;

#[derive(Debug, Default, Copy, Clone)]
#[repr(C)]
pub struct ColorVertex {
    pub position: Vec3<f32>,
    pub color: Vec3<f32>,
}

unsafe impl bytemuck::Pod for ColorVertex {}
unsafe impl bytemuck::Zeroable for ColorVertex {}

pub fn triangle() -> [ColorVertex; 3] {
    [
        ColorVertex {
            position: Vec3::new(-0.8, -0.5, 0.0),
            color: Vec3::new(0.0, 1.0, 1.0),
        },
        ColorVertex {
            position: Vec3::new(0.8, -0.5, 0.0),
            color: Vec3::new(0.0, 0.5, 0.8),
        },
        ColorVertex {
            position: Vec3::new(0.0, 0.5, 0.0),
            color: Vec3::new(0.0, 0.3, 0.7),
        },
    ]
}

pub struct TriangleRenderer {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

impl TriangleRenderer {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, String> {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&triangle()),
            glow::STATIC_DRAW,
        );

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(
            0,
            3,
            glow::FLOAT,
            false,
            mem::size_of::<ColorVertex>() as _,
            offset_of!(ColorVertex, position) as _,
        );
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(
            1,
            3,
            glow::FLOAT,
            false,
            mem::size_of::<ColorVertex>() as _,
            offset_of!(ColorVertex, color) as _,
        );

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(TriangleRenderer { vao, vbo })
    }

    pub unsafe fn draw(&self, gl: &glow::Context) {
        gl.bind_vertex_array(Some(self.vao));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);
    }

    pub unsafe fn delete(self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
    }
}

#[test]
fn test_vertex_layout() {
    assert_eq!(mem::size_of::<ColorVertex>(), 6 * mem::size_of::<f32>());
    assert_eq!(offset_of!(ColorVertex, color), 3 * mem::size_of::<f32>());
}
