//! Interactive state for the checklist screen.
//!
//! The checklist itself lives in the `ChecklistStore`. Everything else here
//! (which drug is expanded, where the cursor sits, whether the reset modal
//! is up, the last status line) is view state and dies with the process.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use acscheck_contracts::{
    catalog::DrugDefinition,
    outcome::{AdministerOutcome, ToggleOutcome},
};
use acscheck_core::ChecklistStore;

/// Question shown in the reset modal.
pub const RESET_PROMPT: &str = "確定要重置所有紀錄嗎？所有勾選與時間將會清除。";

/// One selectable line of the accordion. Indices are catalog positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Drug(usize),
    Check { drug: usize, item: usize },
    /// Record-administration action; only present once every check is cleared.
    Action(usize),
    /// Disabled stand-in for `Action` while checks remain open.
    Pending(usize),
}

impl Row {
    /// Catalog index of the drug this row belongs to.
    pub fn drug(self) -> usize {
        match self {
            Row::Drug(drug) | Row::Check { drug, .. } | Row::Action(drug) | Row::Pending(drug) => {
                drug
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

pub struct App {
    store: ChecklistStore,
    /// At most one drug is expanded at a time.
    open_drug: Option<usize>,
    cursor: usize,
    confirm_reset: bool,
    status: Option<StatusLine>,
    should_quit: bool,
}

impl App {
    pub fn new(store: ChecklistStore) -> Self {
        Self {
            store,
            open_drug: None,
            cursor: 0,
            confirm_reset: false,
            status: None,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &ChecklistStore {
        &self.store
    }

    pub fn open_drug(&self) -> Option<usize> {
        self.open_drug
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn confirming_reset(&self) -> bool {
        self.confirm_reset
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn drug_at(&self, index: usize) -> Option<&DrugDefinition> {
        self.store.catalog().iter().nth(index)
    }

    /// Visible rows, top to bottom.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (index, drug) in self.store.catalog().iter().enumerate() {
            rows.push(Row::Drug(index));
            if self.open_drug == Some(index) {
                rows.extend((0..drug.checklist.len()).map(|item| Row::Check { drug: index, item }));
                if self.store.all_cleared(&drug.id) {
                    rows.push(Row::Action(index));
                } else {
                    rows.push(Row::Pending(index));
                }
            }
        }
        rows
    }

    pub fn selected(&self) -> Option<Row> {
        self.rows().get(self.cursor).copied()
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.confirm_reset {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.reset(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_reset = false;
                    self.set_status(StatusKind::Info, "已取消重置");
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.rows().len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('a') => {
                if let Some(row) = self.selected() {
                    self.record(row.drug());
                }
            }
            KeyCode::Char('R') => {
                self.confirm_reset = true;
                self.status = None;
            }
            KeyCode::Esc => {
                if let Some(open) = self.open_drug {
                    self.expand(open);
                }
            }
            _ => {}
        }
    }

    fn activate(&mut self) {
        match self.selected() {
            Some(Row::Drug(drug)) => self.expand(drug),
            Some(Row::Check { drug, item }) => self.toggle(drug, item),
            Some(Row::Action(drug)) | Some(Row::Pending(drug)) => self.record(drug),
            None => {}
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Expand `drug`, or collapse it if it is already open. The cursor
    /// follows the drug's header.
    fn expand(&mut self, drug: usize) {
        self.open_drug = if self.open_drug == Some(drug) {
            None
        } else {
            Some(drug)
        };
        self.cursor = self
            .rows()
            .iter()
            .position(|row| *row == Row::Drug(drug))
            .unwrap_or(0);
    }

    fn toggle(&mut self, drug: usize, item: usize) {
        let Some((drug_id, check_id)) = self
            .drug_at(drug)
            .and_then(|d| d.checklist.get(item).map(|c| (d.id.clone(), c.id.clone())))
        else {
            return;
        };

        match self.store.toggle_check(&drug_id, &check_id) {
            ToggleOutcome::Checked | ToggleOutcome::Unchecked => self.status = None,
            ToggleOutcome::Locked { administered_time } => self.set_status(
                StatusKind::Warn,
                format!("已執行於 {}，核對項目已鎖定", administered_time),
            ),
            ToggleOutcome::UnknownDrug | ToggleOutcome::UnknownCheck => {
                self.set_status(StatusKind::Warn, "核對項目不存在")
            }
        }
        self.clamp_cursor();
    }

    fn record(&mut self, drug: usize) {
        let Some((drug_id, name)) = self.drug_at(drug).map(|d| (d.id.clone(), d.name.clone()))
        else {
            return;
        };

        match self.store.record_administration(&drug_id) {
            AdministerOutcome::Recorded { time } => {
                self.set_status(StatusKind::Info, format!("{} 已執行於 {}", name, time))
            }
            AdministerOutcome::AlreadyAdministered { time } => {
                self.set_status(StatusKind::Info, format!("{} 已執行於 {}", name, time))
            }
            AdministerOutcome::ChecklistIncomplete { missing } => self.set_status(
                StatusKind::Warn,
                format!("{} 尚有 {} 項禁忌症未確認", name, missing.len()),
            ),
            AdministerOutcome::UnknownDrug => self.set_status(StatusKind::Warn, "藥物不存在"),
        }
    }

    fn reset(&mut self) {
        self.store.reset();
        info!("checklist reset confirmed");
        self.confirm_reset = false;
        self.open_drug = None;
        self.cursor = 0;
        self.set_status(StatusKind::Info, "所有紀錄已重置");
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind,
            text: text.into(),
        });
    }
}
