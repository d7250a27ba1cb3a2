use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneGeometry {
	pub rooms: Vec<Room>,
	pub walls: Vec<Wall>,
	pub doors: Vec<Opening>,
	pub windows: Vec<Opening>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub width: f64,
	pub depth: f64,
	pub height: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wall {
	pub start: [f64; 2],
	pub end: [f64; 2],
	pub height: f64,
	pub thickness: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Opening {
	pub position: [f64; 2],
	pub width: f64,
	pub height: f64,
}

/// The fixed conversion payload: two rooms, two walls, one door, one window.
/// The uploaded file contents never influence it.
pub fn stub_geometry() -> SceneGeometry {
	SceneGeometry {
		rooms: vec![
			Room {
				id: "room1".to_string(),
				kind: "living".to_string(),
				width: 5.0,
				depth: 4.0,
				height: 2.8,
			},
			Room {
				id: "room2".to_string(),
				kind: "bedroom".to_string(),
				width: 3.5,
				depth: 3.0,
				height: 2.8,
			},
		],
		walls: vec![
			Wall { start: [0.0, 0.0], end: [5.0, 0.0], height: 2.8, thickness: 0.2 },
			Wall { start: [5.0, 0.0], end: [5.0, 4.0], height: 2.8, thickness: 0.2 },
		],
		doors: vec![Opening { position: [2.5, 0.0], width: 0.9, height: 2.1 }],
		windows: vec![Opening { position: [1.0, 2.8], width: 1.2, height: 1.5 }],
	}
}
