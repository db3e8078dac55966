mod buffer;
mod gpu;


pub use buffer::{BufferInitDescriptor, BindGroupDescriptor, BindingResourceTemplate};
pub use gpu::{setup_gpu, choose_surface_format};
