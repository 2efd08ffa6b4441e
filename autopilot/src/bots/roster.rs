use pod_racer_core::{Estimator, PilotConfig, SteeringMode};

pub(super) struct Preset {
    pub id: &'static str,
    pub description: &'static str,
    build: fn() -> PilotConfig,
}

const PRESETS: &[Preset] = &[
    Preset {
        id: "pod-anticipate",
        description: "Bisector steering with heading and hit-prediction braking, boost on the longest leg.",
        build: anticipate,
    },
    Preset {
        id: "pod-direct",
        description: "Aims at checkpoint centers, jumping to the following one when fast and close; brakes on approach and on heading angle.",
        build: direct,
    },
];

pub(super) fn presets() -> &'static [Preset] {
    PRESETS
}

pub fn bot_config(id: &str) -> Option<PilotConfig> {
    presets()
        .iter()
        .find(|preset| preset.id == id)
        .map(|preset| {
            let mut config = (preset.build)();
            config.id = preset.id.to_string();
            config.description = preset.description.to_string();
            config
        })
}

fn anticipate() -> PilotConfig {
    PilotConfig::default()
}

fn direct() -> PilotConfig {
    PilotConfig {
        steering: SteeringMode::CheckpointCenter,
        estimators: vec![Estimator::Distance, Estimator::Angle],
        ..PilotConfig::default()
    }
}
