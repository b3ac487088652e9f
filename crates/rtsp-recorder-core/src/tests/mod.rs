mod camera;
mod credentials;
mod outcome;
