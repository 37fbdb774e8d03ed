//! Roster builders shared by the integration tests.
#![allow(dead_code)]

use rollcall_core::{Cell, RawRow};

pub const NAME: &str = "Therapist Name";
pub const WARD: &str = "Ward";
pub const PRESENT: &str = "Present?";
pub const MS: &str = "Must See (P1)\nTotal";
pub const P2: &str = "P2 Total (P2/1)";
pub const P3: &str = "P3  Total";
pub const TRAINEE: &str = "Trainee-led";
pub const CAN_HELP: &str = "Can help?";
pub const NEED_HELP: &str = "Need help?";
pub const NOTES: &str = "Notes";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One staff member, present with nothing to hand over unless told
/// otherwise.
#[derive(Debug, Clone)]
pub struct Staff {
    pub name: String,
    pub ward: String,
    pub present: Cell,
    pub ms: u32,
    pub p2: String,
    pub p3: u32,
    pub trainee: u32,
    pub can_help: String,
    pub need_help: String,
    pub notes: String,
}

impl Staff {
    pub fn new(name: &str, ward: &str) -> Self {
        Self {
            name: name.into(),
            ward: ward.into(),
            present: Cell::from("Yes"),
            ms: 0,
            p2: String::new(),
            p3: 0,
            trainee: 0,
            can_help: String::new(),
            need_help: String::new(),
            notes: String::new(),
        }
    }

    pub fn absent(mut self) -> Self {
        self.present = Cell::from("No");
        self
    }

    pub fn present_cell(mut self, cell: Cell) -> Self {
        self.present = cell;
        self
    }

    pub fn ms(mut self, n: u32) -> Self {
        self.ms = n;
        self
    }

    pub fn p2(mut self, text: &str) -> Self {
        self.p2 = text.into();
        self
    }

    pub fn p3(mut self, n: u32) -> Self {
        self.p3 = n;
        self
    }

    pub fn trainee(mut self, n: u32) -> Self {
        self.trainee = n;
        self
    }

    pub fn can_help(mut self, text: &str) -> Self {
        self.can_help = text.into();
        self
    }

    pub fn need_help(mut self, text: &str) -> Self {
        self.need_help = text.into();
        self
    }

    pub fn notes(mut self, text: &str) -> Self {
        self.notes = text.into();
        self
    }

    pub fn row(&self) -> RawRow {
        RawRow::new()
            .with(NAME, self.name.as_str())
            .with(WARD, self.ward.as_str())
            .with(PRESENT, self.present.clone())
            .with(MS, self.ms)
            .with(P2, self.p2.as_str())
            .with(P3, self.p3)
            .with(TRAINEE, self.trainee)
            .with(CAN_HELP, self.can_help.as_str())
            .with(NEED_HELP, self.need_help.as_str())
            .with(NOTES, self.notes.as_str())
    }
}

pub fn rows(staff: &[Staff]) -> Vec<RawRow> {
    staff.iter().map(Staff::row).collect()
}
