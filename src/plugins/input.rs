// Input router: keyboard and HUD buttons -> GameCommand events.
use bevy::prelude::*;

use crate::plugins::camera::CameraView;
use crate::plugins::game_state::RoundSet;
use crate::plugins::lighting::LightMode;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    StartRound,
    SpawnBall,
    ChargeShot,
    ReleaseShot,
    SetView(CameraView),
    SetLight(LightMode),
    CycleLight,
}

/// Command for a key going down.
pub fn command_for_press(key: KeyCode) -> Option<GameCommand> {
    match key {
        KeyCode::Digit1 => Some(GameCommand::SetView(CameraView::Sideline)),
        KeyCode::Digit2 => Some(GameCommand::SetView(CameraView::Baseline)),
        KeyCode::Digit3 => Some(GameCommand::SetView(CameraView::Overhead)),
        KeyCode::Space => Some(GameCommand::StartRound),
        KeyCode::KeyQ => Some(GameCommand::SpawnBall),
        KeyCode::KeyK => Some(GameCommand::ChargeShot),
        KeyCode::KeyL => Some(GameCommand::CycleLight),
        _ => None,
    }
}

/// Command for a key coming up.
pub fn command_for_release(key: KeyCode) -> Option<GameCommand> {
    match key {
        KeyCode::KeyK => Some(GameCommand::ReleaseShot),
        _ => None,
    }
}

/// HUD button that issues a command when pressed.
#[derive(Component, Debug, Clone, Copy)]
pub struct CommandButton(pub GameCommand);

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GameCommand>()
            .add_systems(Update, (route_keyboard, route_buttons).in_set(RoundSet::Input));
    }
}

fn route_keyboard(keys: Res<ButtonInput<KeyCode>>, mut ev_cmd: EventWriter<GameCommand>) {
    for key in keys.get_just_pressed() {
        if let Some(cmd) = command_for_press(*key) {
            ev_cmd.send(cmd);
        }
    }
    for key in keys.get_just_released() {
        if let Some(cmd) = command_for_release(*key) {
            ev_cmd.send(cmd);
        }
    }
}

fn route_buttons(
    q: Query<(&Interaction, &CommandButton), (Changed<Interaction>, With<Button>)>,
    mut ev_cmd: EventWriter<GameCommand>,
) {
    for (interaction, button) in &q {
        if *interaction == Interaction::Pressed {
            ev_cmd.send(button.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_keys() {
        assert_eq!(command_for_press(KeyCode::Digit1), Some(GameCommand::SetView(CameraView::Sideline)));
        assert_eq!(command_for_press(KeyCode::Digit3), Some(GameCommand::SetView(CameraView::Overhead)));
    }

    #[test]
    fn shoot_is_press_then_release() {
        assert_eq!(command_for_press(KeyCode::KeyK), Some(GameCommand::ChargeShot));
        assert_eq!(command_for_release(KeyCode::KeyK), Some(GameCommand::ReleaseShot));
        assert_eq!(command_for_release(KeyCode::KeyQ), None);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(command_for_press(KeyCode::KeyZ), None);
    }
}
