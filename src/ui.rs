use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::{io, time::Duration};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use banter::models::{ContactStatus, Message};
use banter::store::ChatStore;

// Export types needed by the main module
pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

/// What the main loop should do in response to a key event. Everything else
/// (focus, search text, emoji panel) is handled inside the UI itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Quit,
    Select(u32),
    Send(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Contacts,
    Compose,
    Search,
}

/// Emojis offered by the picker panel.
const EMOJIS: [&str; 12] = [
    "😀", "😂", "😊", "😍", "🤔", "👍", "👋", "🙏", "🎉", "❤️", "😎", "🔥",
];

struct EmojiPanel {
    cursor: usize,
}

pub struct ChatUI {
    input: Input,
    search: Input,
    focus: Focus,
    /// Highlighted row among the *visible* (filtered) contact rows.
    cursor: usize,
    emoji_panel: Option<EmojiPanel>,
}

impl ChatUI {
    pub fn new() -> Self {
        ChatUI {
            input: Input::default(),
            search: Input::default(),
            focus: Focus::Contacts,
            cursor: 0,
            emoji_panel: None,
        }
    }

    /// Poll for one key event and translate it into a `UiAction`.
    ///
    /// Returns `Ok(None)` when nothing actionable happened within the poll
    /// window.
    pub fn handle_input(&mut self, store: &ChatStore) -> Result<Option<UiAction>> {
        if !event::poll(Duration::from_millis(10))? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        // The emoji panel swallows all keys while open.
        if let Some(panel) = &mut self.emoji_panel {
            match key.code {
                KeyCode::Esc => {
                    self.emoji_panel = None;
                }
                KeyCode::Left => {
                    panel.cursor = (panel.cursor + EMOJIS.len() - 1) % EMOJIS.len();
                }
                KeyCode::Right => {
                    panel.cursor = (panel.cursor + 1) % EMOJIS.len();
                }
                KeyCode::Enter => {
                    let emoji = EMOJIS[panel.cursor];
                    self.input = Input::new(format!("{}{}", self.input.value(), emoji));
                    self.emoji_panel = None;
                    self.focus = Focus::Compose;
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(UiAction::Quit)),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Contacts => Focus::Compose,
                    Focus::Compose => Focus::Search,
                    Focus::Search => Focus::Contacts,
                };
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.emoji_panel = Some(EmojiPanel { cursor: 0 });
            }
            KeyCode::Up if self.focus == Focus::Contacts => {
                let visible = store.visible(self.search.value());
                if !visible.is_empty() {
                    self.cursor = (self.cursor + visible.len() - 1) % visible.len();
                }
            }
            KeyCode::Down if self.focus == Focus::Contacts => {
                let visible = store.visible(self.search.value());
                if !visible.is_empty() {
                    self.cursor = (self.cursor + 1) % visible.len();
                }
            }
            KeyCode::Enter => match self.focus {
                Focus::Contacts => {
                    let visible = store.visible(self.search.value());
                    if let Some(&id) = visible.get(self.cursor.min(visible.len().saturating_sub(1)))
                    {
                        return Ok(Some(UiAction::Select(id)));
                    }
                }
                Focus::Compose => {
                    if !self.input.value().is_empty() {
                        let text = self.input.value().to_string();
                        self.input = Input::default();
                        return Ok(Some(UiAction::Send(text)));
                    }
                }
                Focus::Search => {
                    self.focus = Focus::Contacts;
                }
            },
            _ => match self.focus {
                Focus::Compose => {
                    self.input.handle_event(&Event::Key(key));
                }
                Focus::Search => {
                    self.search.handle_event(&Event::Key(key));
                    // The filtered row set changed under the cursor.
                    self.cursor = 0;
                }
                Focus::Contacts => {}
            },
        }
        Ok(None)
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>, store: &ChatStore) {
        let size = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Contacts panel
                Constraint::Percentage(70), // Chat panel
            ])
            .split(size);

        let contacts_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search box
                Constraint::Min(5),    // Contact rows
            ])
            .split(chunks[0]);

        let chat_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Messages
                Constraint::Length(3), // Input box
                Constraint::Length(1), // Help line
            ])
            .split(chunks[1]);

        self.draw_search(frame, contacts_chunks[0]);
        self.draw_contacts(frame, store, contacts_chunks[1]);
        self.draw_header(frame, store, chat_chunks[0]);
        draw_messages(frame, store, chat_chunks[1]);
        self.draw_input(frame, chat_chunks[2]);
        draw_help(frame, chat_chunks[3]);

        // Cursor follows the focused text box.
        match self.focus {
            Focus::Compose => frame.set_cursor(
                chat_chunks[2].x + self.input.cursor() as u16 + 1,
                chat_chunks[2].y + 1,
            ),
            Focus::Search => frame.set_cursor(
                contacts_chunks[0].x + self.search.cursor() as u16 + 1,
                contacts_chunks[0].y + 1,
            ),
            Focus::Contacts => {}
        }

        if let Some(panel) = &self.emoji_panel {
            draw_emoji_panel(frame, panel, size);
        }
    }

    fn draw_search<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let search_block = Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(match self.focus {
                Focus::Search => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            });
        let search_widget = Paragraph::new(self.search.value()).block(search_block);
        frame.render_widget(search_widget, area);
    }

    fn draw_contacts<B: Backend>(&self, frame: &mut Frame<B>, store: &ChatStore, area: Rect) {
        let visible = store.visible(self.search.value());
        let cursor = self.cursor.min(visible.len().saturating_sub(1));
        let preview_width = area.width.saturating_sub(8) as usize;

        let rows: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let contact = store.contacts().iter().find(|c| c.id == *id)?;
                let marker = if i == cursor { "> " } else { "  " };
                // Presence dot only for contacts that are actually online.
                let dot = if contact.status == ContactStatus::Online {
                    Span::styled("● ", Style::default().fg(Color::Green))
                } else {
                    Span::raw("  ")
                };
                let name_style = if store.selected_id() == Some(contact.id) {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let mut top = vec![
                    Span::raw(marker),
                    dot,
                    Span::styled(contact.name.clone(), name_style),
                    Span::styled(
                        format!(" · {}", contact.last_time),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if contact.unread > 0 {
                    top.push(Span::styled(
                        format!(" ({})", contact.unread),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ));
                }

                let bottom = Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("[{}] ", contact.initials()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        truncate(&contact.last_message, preview_width),
                        Style::default().fg(Color::Gray),
                    ),
                ]);

                Some(ListItem::new(Text::from(vec![Line::from(top), bottom])))
            })
            .collect();

        let contacts_list = List::new(rows).block(
            Block::default()
                .title("Contacts")
                .borders(Borders::ALL)
                .border_style(match self.focus {
                    Focus::Contacts => Style::default().fg(Color::Yellow),
                    _ => Style::default(),
                }),
        );
        frame.render_widget(contacts_list, area);
    }

    fn draw_header<B: Backend>(&self, frame: &mut Frame<B>, store: &ChatStore, area: Rect) {
        let header = match store.selected_contact() {
            Some(contact) => Line::from(vec![
                Span::styled(
                    contact.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", contact.status.label()),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            None => Line::from(Span::styled(
                "Select a contact",
                Style::default().fg(Color::DarkGray),
            )),
        };

        let header_widget =
            Paragraph::new(header).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header_widget, area);
    }

    fn draw_input<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let input_block = Block::default()
            .title("Message")
            .borders(Borders::ALL)
            .border_style(match self.focus {
                Focus::Compose => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            });
        let input_widget = Paragraph::new(self.input.value()).block(input_block);
        frame.render_widget(input_widget, area);
    }
}

impl Default for ChatUI {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_messages<B: Backend>(frame: &mut Frame<B>, store: &ChatStore, area: Rect) {
    let wrap_width = area.width.saturating_sub(2) as usize; // Account for borders
    let peer = store
        .selected_contact()
        .map(|c| c.name.clone())
        .unwrap_or_default();

    let rows: Vec<ListItem> = store
        .thread()
        .iter()
        .flat_map(|m| bubble_lines(m, &peer, wrap_width))
        .collect();

    // Select the last row so the list stays scrolled to the newest entry.
    let mut list_state = ListState::default();
    if !rows.is_empty() {
        list_state.select(Some(rows.len() - 1));
    }

    let messages_list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title("Messages"))
        .highlight_style(Style::default()); // Keep the selection invisible

    frame.render_stateful_widget(messages_list, area, &mut list_state);
}

fn bubble_lines(message: &Message, peer: &str, wrap_width: usize) -> Vec<ListItem<'static>> {
    let author = if message.is_sent() { "You" } else { peer };
    let full_content = format!("[{}] {}: {}", message.time, author, message.text);

    let style = if message.is_sent() {
        Style::default().fg(Color::Blue)
    } else {
        Style::default()
    };

    wrap(&full_content, wrap_width.max(10))
        .into_iter()
        .map(|line| ListItem::new(Text::from(line.into_owned())).style(style))
        .collect()
}

fn draw_help<B: Backend>(frame: &mut Frame<B>, area: Rect) {
    let help = Paragraph::new(Line::from(vec![Span::styled(
        "ESC quit | TAB focus | ↑/↓ move | Enter select/send | Ctrl+E emoji",
        Style::default().fg(Color::Gray),
    )]));
    frame.render_widget(help, area);
}

fn draw_emoji_panel<B: Backend>(frame: &mut Frame<B>, panel: &EmojiPanel, area: Rect) {
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 5.min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    let popup_block = Block::default()
        .title("Emoji")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    frame.render_widget(Clear, popup_area); // Clear the area first
    frame.render_widget(popup_block, popup_area);

    let inner_area = popup_area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });

    let spans: Vec<Span> = EMOJIS
        .iter()
        .enumerate()
        .map(|(i, emoji)| {
            if i == panel.cursor {
                Span::styled(
                    format!("[{}]", emoji),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(format!(" {} ", emoji))
            }
        })
        .collect();

    let picker = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(
            "←/→ move | Enter insert | Esc close",
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(picker, inner_area);
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
