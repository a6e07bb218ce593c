// src/results_page.rs

use crate::model::DriverEntry;
use gtk::prelude::*;
use gtk::{
    Box as GtkBox, Button, CheckButton, Label, ListBox, ListBoxRow, Orientation, ScrolledWindow,
    Separator,
};
use std::cell::RefCell;
use std::rc::Rc;

/// The results page of the window: one row per driver entry with a
/// pre-selected checkbox, plus the update buttons.
pub struct ResultsPage {
    pub root: GtkBox,
    pub back_button: Button,
    pub select_all_button: Button,
    pub update_selected_button: Button,
    pub update_all_button: Button,
    summary_label: Label,
    listbox: ListBox,
    rows: RefCell<Vec<(CheckButton, String)>>,
}

impl ResultsPage {
    pub fn new() -> Rc<Self> {
        let root = GtkBox::new(Orientation::Vertical, 0);

        // Top panel for buttons
        let button_panel = GtkBox::new(Orientation::Horizontal, 12);
        button_panel.set_margin_top(16);
        button_panel.set_margin_bottom(16);
        button_panel.set_margin_start(16);
        button_panel.set_margin_end(16);
        button_panel.set_halign(gtk::Align::Center);

        let back_button = Button::with_label("🔄 New Scan");
        back_button.add_css_class("header-button");
        back_button.add_css_class("refresh-button");

        let select_all_button = Button::with_label("☑️ Select/Deselect All");
        select_all_button.add_css_class("header-button");
        select_all_button.add_css_class("select-button");

        let update_selected_button = Button::with_label("⬇️ Update Selected");
        update_selected_button.add_css_class("header-button");
        update_selected_button.add_css_class("install-button");

        let update_all_button = Button::with_label("🚀 Update All");
        update_all_button.add_css_class("header-button");
        update_all_button.add_css_class("install-button");

        button_panel.append(&back_button);
        button_panel.append(&select_all_button);
        button_panel.append(&update_selected_button);
        button_panel.append(&update_all_button);
        root.append(&button_panel);

        let summary_label = Label::new(None);
        summary_label.set_halign(gtk::Align::Start);
        summary_label.set_margin_start(16);
        summary_label.set_margin_bottom(8);
        root.append(&summary_label);

        root.append(&Separator::new(Orientation::Horizontal));

        // List header row
        let header_row = GtkBox::new(Orientation::Horizontal, 0);
        header_row.set_margin_top(12);
        header_row.set_margin_start(16);
        header_row.set_margin_end(16);
        header_row.set_margin_bottom(8);

        let select_header = Label::new(None);
        select_header.set_width_chars(6);
        select_header.set_halign(gtk::Align::Center);
        select_header.set_markup("<b>Select</b>");

        let name_header = Label::new(None);
        name_header.set_hexpand(true);
        name_header.set_halign(gtk::Align::Start);
        name_header.set_markup("<b>Package Name</b>");

        let version_header = Label::new(None);
        version_header.set_width_chars(30);
        version_header.set_halign(gtk::Align::Center);
        version_header.set_markup("<b>Version</b>");

        let status_header = Label::new(None);
        status_header.set_width_chars(14);
        status_header.set_halign(gtk::Align::Center);
        status_header.set_markup("<b>Status</b>");

        header_row.append(&select_header);
        header_row.append(&name_header);
        header_row.append(&version_header);
        header_row.append(&status_header);
        root.append(&header_row);

        root.append(&Separator::new(Orientation::Horizontal));

        let scrolled_window = ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .margin_top(8)
            .margin_bottom(16)
            .margin_start(16)
            .margin_end(16)
            .build();

        let listbox = ListBox::new();
        listbox.set_selection_mode(gtk::SelectionMode::None);
        scrolled_window.set_child(Some(&listbox));
        root.append(&scrolled_window);

        let page = Rc::new(Self {
            root,
            back_button,
            select_all_button,
            update_selected_button,
            update_all_button,
            summary_label,
            listbox,
            rows: RefCell::new(Vec::new()),
        });

        let page_clone = Rc::clone(&page);
        page.select_all_button.connect_clicked(move |_| {
            page_clone.toggle_select_all();
        });

        page
    }

    /// Rebuilds the list from a fresh scan. The previous rows are
    /// discarded wholesale.
    pub fn populate(&self, entries: &[DriverEntry]) {
        while let Some(child) = self.listbox.first_child() {
            self.listbox.remove(&child);
        }
        self.rows.borrow_mut().clear();

        if entries.is_empty() {
            self.summary_label.set_text("");
            let row = ListBoxRow::new();
            let empty_box = GtkBox::new(Orientation::Horizontal, 12);
            empty_box.set_margin_top(20);
            empty_box.set_margin_bottom(20);
            empty_box.set_halign(gtk::Align::Center);

            let empty_label = Label::new(None);
            empty_label.set_markup("<big><b>✅ All your drivers are up to date!</b></big>");
            empty_box.append(&empty_label);

            row.set_child(Some(&empty_box));
            self.listbox.append(&row);
            return;
        }

        self.summary_label.set_markup(&format!(
            "<b>{}</b> driver update(s) found",
            entries.len()
        ));

        for entry in entries {
            let row = ListBoxRow::new();
            row.add_css_class("package-row");

            let hbox = GtkBox::new(Orientation::Horizontal, 12);
            hbox.set_margin_top(8);
            hbox.set_margin_bottom(8);
            hbox.set_margin_start(8);
            hbox.set_margin_end(8);

            let check = CheckButton::new();
            check.set_active(true);
            check.set_halign(gtk::Align::Center);

            let name_label = Label::new(Some(&entry.package_name));
            name_label.set_hexpand(true);
            name_label.set_halign(gtk::Align::Start);
            name_label.add_css_class("package-name");

            let version_text = if entry.current_version.is_empty() {
                entry.available_version.clone()
            } else {
                format!("{} → {}", entry.current_version, entry.available_version)
            };
            let version_label = Label::new(Some(&version_text));
            version_label.set_width_chars(30);
            version_label.set_halign(gtk::Align::Center);
            version_label.set_ellipsize(pango::EllipsizeMode::Middle);
            version_label.add_css_class("version-info");

            let status_label = Label::new(None);
            status_label.set_width_chars(14);
            status_label.set_halign(gtk::Align::Center);
            if entry.is_recommended {
                status_label.set_markup("<b>⭐ recommended</b>");
                status_label.add_css_class("recommended");
            }

            hbox.append(&check);
            hbox.append(&name_label);
            hbox.append(&version_label);
            hbox.append(&status_label);

            row.set_child(Some(&hbox));
            self.listbox.append(&row);

            self.rows
                .borrow_mut()
                .push((check, entry.package_name.clone()));
        }
    }

    pub fn selected_packages(&self) -> Vec<String> {
        self.rows
            .borrow()
            .iter()
            .filter(|(check, _)| check.is_active())
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub fn all_packages(&self) -> Vec<String> {
        self.rows
            .borrow()
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn toggle_select_all(&self) {
        let rows = self.rows.borrow();
        let all_selected = rows.iter().all(|(check, _)| check.is_active());
        for (check, _) in rows.iter() {
            check.set_active(!all_selected);
        }
    }
}
