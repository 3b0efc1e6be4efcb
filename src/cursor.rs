//! A tiny shm cursor, distinct from any theme cursor so it is obvious when it is shown

use std::fmt;

use smithay_client_toolkit::{
    compositor::{CompositorState, SurfaceData},
    reexports::client::{
        protocol::{wl_pointer::WlPointer, wl_shm, wl_surface::WlSurface},
        Dispatch, QueueHandle,
    },
    shm::{
        slot::{Buffer, CreateBufferError, SlotPool},
        CreatePoolError, Shm,
    },
};

/// Width and height of the cursor image
pub const CURSOR_SIZE: u32 = 4;

/// XRGB8888 pixels, a black frame around a white 2x2 square
pub const CURSOR_BITMAP: [u32; (CURSOR_SIZE * CURSOR_SIZE) as usize] = [
    0x000000, 0x000000, 0x000000, 0x000000, //
    0x000000, 0xFFFFFF, 0xFFFFFF, 0x000000, //
    0x000000, 0xFFFFFF, 0xFFFFFF, 0x000000, //
    0x000000, 0x000000, 0x000000, 0x000000, //
];

/// Errors while building the cursor
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// The shm pool could not be created
    #[error("Failed to create cursor shared memory: {0}")]
    Pool(#[from] CreatePoolError),
    /// The buffer could not be carved out of the pool
    #[error("Failed to create cursor buffer: {0}")]
    Buffer(#[from] CreateBufferError),
    /// Attaching the buffer was refused
    #[error("Failed to attach cursor buffer: {0}")]
    Attach(String),
}

/// Writes [`CURSOR_BITMAP`] in the little endian layout `wl_shm` expects.
///
/// `canvas` has to hold at least `CURSOR_SIZE * CURSOR_SIZE * 4` bytes.
pub fn write_cursor_bitmap(canvas: &mut [u8]) {
    canvas
        .chunks_exact_mut(4)
        .zip(CURSOR_BITMAP.iter())
        .for_each(|(chunk, pixel)| chunk.copy_from_slice(&pixel.to_le_bytes()));
}

/// Surface holding the cursor image, set on the pointer when it enters the window
pub struct CursorSurface {
    surface: WlSurface,
    hotspot: (i32, i32),
    // the buffer has to outlive the surface it is attached to
    _buffer: Buffer,
    _pool: SlotPool,
}

impl fmt::Debug for CursorSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorSurface")
            .field("surface", &self.surface)
            .field("hotspot", &self.hotspot)
            .finish_non_exhaustive()
    }
}

impl CursorSurface {
    /// Allocates the image and commits it on a dedicated surface
    pub fn new<D>(
        compositor: &CompositorState,
        shm: &Shm,
        hotspot: (i32, i32),
        qh: &QueueHandle<D>,
    ) -> Result<Self, CursorError>
    where
        D: Dispatch<WlSurface, SurfaceData> + 'static,
    {
        let stride = CURSOR_SIZE as i32 * 4;
        let len = (CURSOR_SIZE * CURSOR_SIZE * 4) as usize;

        let mut pool = SlotPool::new(len, shm)?;
        let (buffer, canvas) = pool.create_buffer(
            CURSOR_SIZE as i32,
            CURSOR_SIZE as i32,
            stride,
            wl_shm::Format::Xrgb8888,
        )?;
        write_cursor_bitmap(canvas);

        let surface = compositor.create_surface(qh);
        buffer
            .attach_to(&surface)
            .map_err(|err| CursorError::Attach(err.to_string()))?;
        surface.commit();

        Ok(CursorSurface {
            surface,
            hotspot,
            _buffer: buffer,
            _pool: pool,
        })
    }

    /// Shows this image for `pointer`, `serial` is the one of the enter event
    pub fn set_on(&self, pointer: &WlPointer, serial: u32) {
        pointer.set_cursor(serial, Some(&self.surface), self.hotspot.0, self.hotspot.1);
    }
}

impl Drop for CursorSurface {
    fn drop(&mut self) {
        self.surface.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_is_framed() {
        let mut canvas = [0xAAu8; 64];
        write_cursor_bitmap(&mut canvas);

        let pixel = |x: usize, y: usize| {
            let offset = (y * CURSOR_SIZE as usize + x) * 4;
            u32::from_le_bytes(canvas[offset..offset + 4].try_into().unwrap())
        };

        for i in 0..4 {
            assert_eq!(pixel(i, 0), 0x000000);
            assert_eq!(pixel(i, 3), 0x000000);
            assert_eq!(pixel(0, i), 0x000000);
            assert_eq!(pixel(3, i), 0x000000);
        }
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            assert_eq!(pixel(x, y), 0xFFFFFF);
        }
    }

    #[test]
    fn padding_bytes_are_zeroed() {
        let mut canvas = [0xAAu8; 64];
        write_cursor_bitmap(&mut canvas);
        // XRGB: the X byte is the most significant one, last in little endian
        assert!(canvas.chunks_exact(4).all(|px| px[3] == 0));
    }

    #[test]
    fn leaves_trailing_bytes_alone() {
        let mut canvas = [0xAAu8; 68];
        write_cursor_bitmap(&mut canvas);
        assert_eq!(&canvas[64..], &[0xAA; 4]);
    }
}
