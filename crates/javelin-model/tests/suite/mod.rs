mod loader;
mod subtyping;
