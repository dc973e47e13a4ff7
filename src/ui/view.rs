use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{
    domain::{
        animation::ModalPhase,
        launcher::{LauncherPhase, LAUNCHER_HEIGHT, LAUNCHER_WIDTH},
    },
    usecases::shell::AssistantShell,
};

use super::{message_rendering, styles};

pub fn render(frame: &mut Frame<'_>, shell: &AssistantShell) {
    let now = shell.now();

    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let [nav_area, screen_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(1)])
        .areas(content_area);

    render_host_nav(frame, nav_area, shell);
    render_host_screen(frame, screen_area, shell);
    render_launcher(frame, shell, now);

    if shell.modal().is_visible() {
        render_modal(frame, content_area, shell, now);
    }

    let status = Paragraph::new(status_line(shell)).style(styles::status_hint_style());
    frame.render_widget(status, status_area);
}

fn render_host_nav(frame: &mut Frame<'_>, area: Rect, shell: &AssistantShell) {
    let items: Vec<ListItem<'static>> = shell
        .screens()
        .iter()
        .map(|screen| ListItem::new(Line::from(screen.title.to_owned())))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Screens")
                .borders(Borders::ALL)
                .border_style(styles::panel_border_style()),
        )
        .style(styles::screen_list_style())
        .highlight_style(styles::selected_screen_style());

    let mut state = ListState::default();
    state.select(Some(shell.selected_screen()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_host_screen(frame: &mut Frame<'_>, area: Rect, shell: &AssistantShell) {
    let screen = shell.screens()[shell.selected_screen()];
    let context = shell.conversation().session().context();

    let body = vec![
        Line::raw(""),
        Line::from(format!("  route: {}", screen.route)),
        Line::from(format!("  context: {}", context.display_label())),
        Line::raw(""),
        Line::from(Span::styled(
            "  (host screen placeholder — the assistant is the interesting part)",
            styles::status_hint_style(),
        )),
    ];

    let panel = Paragraph::new(body).block(
        Block::default()
            .title(screen.title)
            .borders(Borders::ALL)
            .border_style(styles::panel_border_style()),
    );
    frame.render_widget(panel, area);
}

fn render_launcher(frame: &mut Frame<'_>, shell: &AssistantShell, now: chrono::DateTime<chrono::Utc>) {
    let frame_area = frame.area();
    let (x, y) = shell.launcher().position(now);
    let area = clamp_rect(
        Rect {
            x: x.round().max(0.0) as u16,
            y: y.round().max(0.0) as u16,
            width: LAUNCHER_WIDTH as u16,
            height: LAUNCHER_HEIGHT as u16,
        },
        frame_area,
    );
    if area.width == 0 || area.height == 0 {
        return;
    }

    let pulse = shell.launcher().idle_scale(now);
    let chip = Paragraph::new("AI").block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::launcher_style(pulse)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(chip, area);

    let badge = shell.launcher().badge();
    if badge.is_visible() && area.width > 0 {
        let badge_area = Rect {
            x: area.right().saturating_sub(1),
            y: area.y,
            width: 1,
            height: 1,
        };
        let marker =
            Paragraph::new("●").style(styles::badge_style(badge.scale(now), badge.opacity(now)));
        frame.render_widget(marker, badge_area);
    }
}

fn render_modal(
    frame: &mut Frame<'_>,
    area: Rect,
    shell: &AssistantShell,
    now: chrono::DateTime<chrono::Utc>,
) {
    let scale = shell.modal().scale(now).clamp(0.0, 1.0);
    let opacity = shell.modal().opacity(now);

    let full_width = (u32::from(area.width) * 7 / 10).min(76) as u16;
    let full_height = (u32::from(area.height) * 8 / 10) as u16;
    let width = ((f32::from(full_width) * scale).round() as u16).clamp(3, full_width.max(3));
    let height = ((f32::from(full_height) * scale).round() as u16).clamp(3, full_height.max(3));

    let modal_area = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    let modal_area = clamp_rect(modal_area, area);

    frame.render_widget(Clear, modal_area);

    let session = shell.conversation().session();
    let title = format!(" Sidekick — {} ", session.context().display_label());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::modal_opacity_style(opacity));
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    // While the surface is still scaling up there is no room for content.
    if inner.width < 20 || inner.height < 8 {
        return;
    }

    let [transcript_area, actions_area, composer_area, hint_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(inner);

    render_transcript(frame, transcript_area, shell);
    render_quick_actions(frame, actions_area, shell);
    render_composer(frame, composer_area, shell);

    let hints = Paragraph::new(
        "Enter send · Tab insert suggestion · ↑/↓ pick · ^V voice · ^S speak · ^L clear · Esc close",
    )
    .style(styles::status_hint_style());
    frame.render_widget(hints, hint_area);
}

fn render_transcript(frame: &mut Frame<'_>, area: Rect, shell: &AssistantShell) {
    let session = shell.conversation().session();
    let mut lines = message_rendering::build_transcript(
        session.messages(),
        area.width as usize,
        area.height.saturating_sub(1) as usize,
    );

    if session.is_loading() {
        lines.push(Line::from(Span::styled(
            "Sidekick is thinking…",
            styles::loading_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_quick_actions(frame: &mut Frame<'_>, area: Rect, shell: &AssistantShell) {
    let mut spans = Vec::new();
    for (index, action) in shell.quick_actions().iter().enumerate() {
        let style = if index == shell.selected_action() {
            styles::selected_quick_action_style()
        } else {
            styles::quick_action_style()
        };
        spans.push(Span::styled(format!(" {} ", action.label), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_composer(frame: &mut Frame<'_>, area: Rect, shell: &AssistantShell) {
    let session = shell.conversation().session();
    let composer = shell.composer();

    let title = if session.is_listening() {
        " Listening… "
    } else if session.is_speaking() {
        " Speaking… "
    } else if composer.is_voice_originated() {
        " Voice draft — Enter to send "
    } else {
        " Message "
    };
    let border_style = if session.is_listening() || session.is_speaking() {
        styles::voice_indicator_style()
    } else {
        styles::panel_border_style()
    };

    let (text, text_style) = if composer.is_empty() && !session.is_listening() {
        ("Ask Sidekick…".to_owned(), styles::status_hint_style())
    } else {
        (composer.text().to_owned(), styles::composer_style())
    };
    let input = Paragraph::new(text).style(text_style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);

    // Place the terminal cursor at the edit position.
    let cursor_x = area.x + 1 + composer.cursor().min(area.width.saturating_sub(2) as usize) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn status_line(shell: &AssistantShell) -> String {
    let session = shell.conversation().session();
    let unread = if session.has_unread() { " | unread reply" } else { "" };

    let launcher_note = match shell.launcher().phase() {
        LauncherPhase::Dragging => " | moving chip",
        LauncherPhase::Snapping => " | snapping",
        LauncherPhase::Idle => "",
    };

    match shell.modal().phase() {
        ModalPhase::Open | ModalPhase::Opening => {
            format!("assistant open{unread} | Esc: close")
        }
        ModalPhase::Closing => format!("assistant closing{unread}"),
        ModalPhase::Closed => format!(
            "j/k: switch screen | a/Enter or click the chip: assistant | \
             drag the chip to move it{launcher_note}{unread} | q: quit"
        ),
    }
}

fn clamp_rect(rect: Rect, bounds: Rect) -> Rect {
    let x = rect.x.min(bounds.right().saturating_sub(1));
    let y = rect.y.min(bounds.bottom().saturating_sub(1));
    let width = rect.width.min(bounds.right().saturating_sub(x));
    let height = rect.height.min(bounds.bottom().saturating_sub(y));
    Rect {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rect_keeps_a_rect_inside_its_bounds() {
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let clamped = clamp_rect(
            Rect {
                x: 78,
                y: 23,
                width: 4,
                height: 2,
            },
            bounds,
        );

        assert!(clamped.right() <= bounds.right());
        assert!(clamped.bottom() <= bounds.bottom());
    }

    #[test]
    fn clamp_rect_leaves_interior_rects_untouched() {
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let rect = Rect {
            x: 10,
            y: 5,
            width: 20,
            height: 10,
        };

        assert_eq!(clamp_rect(rect, bounds), rect);
    }
}
