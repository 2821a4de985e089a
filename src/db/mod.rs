pub mod mood_store;

pub use mood_store::MoodStore;
