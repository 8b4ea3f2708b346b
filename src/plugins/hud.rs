// HUD: score, countdown, score history, command buttons and the end-of-round popup.
use bevy::prelude::*;

use crate::config::GameConfig;
use crate::plugins::camera::CameraView;
use crate::plugins::game_state::{GameSession, RoundEndedEvent, RoundSet, RoundStartedEvent, ScoreHistory};
use crate::plugins::input::{CommandButton, GameCommand};
use crate::plugins::lighting::LightMode;

#[derive(Component)]
pub struct ScoreText;
#[derive(Component)]
pub struct CountdownText;
#[derive(Component)]
pub struct HistoryText;
#[derive(Component)]
pub struct FinalScorePopup;

/// Remaining display time of the popup.
#[derive(Resource, Default)]
pub struct PopupTimer(pub Option<Timer>);

const BUTTON_IDLE: Color = Color::srgb(0.16, 0.18, 0.24);
const BUTTON_HOVER: Color = Color::srgb(0.24, 0.28, 0.36);
const BUTTON_PRESSED: Color = Color::srgb(0.15, 0.55, 0.25);

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PopupTimer>()
            .add_systems(Startup, spawn_hud)
            .add_systems(
                Update,
                (update_hud, hide_popup_on_round_start, show_final_score, tick_popup, button_colors).chain().after(RoundSet::Act),
            );
    }
}

/// Countdown label. Negative values never reach the screen.
pub fn countdown_label(remaining_seconds: i32) -> String {
    format!("Time: {}", remaining_seconds.max(0))
}

/// Completed rounds, best first.
pub fn history_label(history: &ScoreHistory) -> String {
    if history.is_empty() {
        return "Scores: --".to_string();
    }
    let list = history
        .sorted_desc()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Scores: {list}")
}

fn text_style(size: f32) -> TextStyle {
    TextStyle { font_size: size, color: Color::WHITE, ..default() }
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(12.0),
                top: Val::Px(8.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((TextBundle::from_section("Score: 0", text_style(26.0)), ScoreText));
            parent.spawn((TextBundle::from_section(countdown_label(0), text_style(22.0)), CountdownText));
            parent.spawn((TextBundle::from_section("Scores: --", text_style(18.0)), HistoryText));
        });

    // Button row along the bottom edge
    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                bottom: Val::Px(12.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(8.0),
                ..default()
            },
            ..default()
        })
        .with_children(|parent| {
            spawn_button(parent, "Start", GameCommand::StartRound);
            for view in CameraView::ALL {
                spawn_button(parent, view.label(), GameCommand::SetView(view));
            }
            for mode in LightMode::ALL {
                spawn_button(parent, mode.label(), GameCommand::SetLight(mode));
            }
        });

    commands.spawn((
        TextBundle::from_section("", text_style(48.0))
            .with_style(Style {
                position_type: PositionType::Absolute,
                top: Val::Percent(38.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            })
            .with_text_justify(JustifyText::Center),
        FinalScorePopup,
    ))
    .insert(Visibility::Hidden);
}

fn spawn_button(parent: &mut ChildBuilder, label: &str, command: GameCommand) {
    parent
        .spawn((
            ButtonBundle {
                style: Style {
                    min_width: Val::Px(84.0),
                    height: Val::Px(36.0),
                    padding: UiRect::horizontal(Val::Px(10.0)),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                background_color: BackgroundColor(BUTTON_IDLE),
                ..default()
            },
            CommandButton(command),
        ))
        .with_children(|b| {
            b.spawn(TextBundle::from_section(label, text_style(18.0)));
        });
}

fn update_hud(
    session: Res<GameSession>,
    mut q_score: Query<&mut Text, (With<ScoreText>, Without<CountdownText>, Without<HistoryText>)>,
    mut q_count: Query<&mut Text, (With<CountdownText>, Without<ScoreText>, Without<HistoryText>)>,
    mut q_hist: Query<&mut Text, (With<HistoryText>, Without<ScoreText>, Without<CountdownText>)>,
) {
    if !session.is_changed() {
        return;
    }
    if let Ok(mut t) = q_score.get_single_mut() {
        t.sections[0].value = format!("Score: {}", session.round.score);
    }
    if let Ok(mut t) = q_count.get_single_mut() {
        t.sections[0].value = countdown_label(session.round.remaining_seconds);
    }
    if let Ok(mut t) = q_hist.get_single_mut() {
        t.sections[0].value = history_label(&session.history);
    }
}

// A new round clears any popup left over from the previous one.
fn hide_popup_on_round_start(
    mut ev_started: EventReader<RoundStartedEvent>,
    mut popup: ResMut<PopupTimer>,
    mut q: Query<&mut Visibility, With<FinalScorePopup>>,
) {
    if ev_started.read().last().is_none() {
        return;
    }
    popup.0 = None;
    for mut vis in &mut q {
        *vis = Visibility::Hidden;
    }
}

fn show_final_score(
    mut ev_ended: EventReader<RoundEndedEvent>,
    cfg: Res<GameConfig>,
    mut popup: ResMut<PopupTimer>,
    mut q: Query<(&mut Text, &mut Visibility), With<FinalScorePopup>>,
) {
    let Some(ended) = ev_ended.read().last() else { return; };
    popup.0 = Some(Timer::from_seconds(cfg.round.popup_seconds, TimerMode::Once));
    if let Ok((mut text, mut vis)) = q.get_single_mut() {
        text.sections[0].value = format!("Final score: {}", ended.final_score);
        *vis = Visibility::Visible;
    }
}

fn tick_popup(
    time: Res<Time>,
    mut popup: ResMut<PopupTimer>,
    mut q: Query<&mut Visibility, With<FinalScorePopup>>,
) {
    let Some(timer) = popup.0.as_mut() else { return; };
    if !timer.tick(time.delta()).finished() {
        return;
    }
    popup.0 = None;
    for mut vis in &mut q {
        *vis = Visibility::Hidden;
    }
}

fn button_colors(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<CommandButton>)>,
) {
    for (interaction, mut bg) in &mut q {
        bg.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        };
    }
}
