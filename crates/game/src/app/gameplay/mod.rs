mod director;
mod entities;
mod hud;
mod level;
mod levels;
mod placement;
mod steering;

pub(crate) use director::{DirectorError, LevelDirector};
pub(crate) use level::{GameRng, LevelName};

#[cfg(test)]
mod tests;
