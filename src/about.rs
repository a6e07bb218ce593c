// src/about.rs

use gtk::prelude::*;
use gtk::{
    ApplicationWindow, Box as GtkBox, Button, HeaderBar, Label, Orientation, Window,
};

pub struct AboutWindow;

impl AboutWindow {
    pub fn new(parent: &ApplicationWindow) -> Window {
        let window = Window::builder()
            .transient_for(parent)
            .modal(true)
            .title("About Driverhub")
            .default_width(380)
            .default_height(300)
            .resizable(false)
            .build();

        let header_bar = HeaderBar::new();
        header_bar.set_title_widget(Some(&Label::new(Some("About"))));
        window.set_titlebar(Some(&header_bar));

        let main_vbox = GtkBox::new(Orientation::Vertical, 0);
        main_vbox.set_halign(gtk::Align::Center);
        main_vbox.set_valign(gtk::Align::Center);
        main_vbox.set_margin_top(30);
        main_vbox.set_margin_bottom(30);
        main_vbox.set_margin_start(40);
        main_vbox.set_margin_end(40);

        let logo_label = Label::new(None);
        logo_label.set_markup("<span size='xx-large'>🔧</span>");
        logo_label.set_halign(gtk::Align::Center);
        logo_label.set_margin_bottom(20);
        main_vbox.append(&logo_label);

        let title_label = Label::new(None);
        title_label.set_markup("<span size='x-large' weight='bold'>Driverhub</span>");
        title_label.set_halign(gtk::Align::Center);
        title_label.set_margin_bottom(8);
        main_vbox.append(&title_label);

        let version_label = Label::new(None);
        version_label.set_markup(&format!(
            "<span size='medium'>Version {}</span>",
            env!("CARGO_PKG_VERSION")
        ));
        version_label.set_halign(gtk::Align::Center);
        version_label.set_margin_bottom(8);
        main_vbox.append(&version_label);

        let link_button = Button::with_label("driverhub on GitHub");
        link_button.set_has_frame(false);
        link_button.add_css_class("link");
        link_button.connect_clicked(|_| {
            if let Err(e) = open::that("https://github.com/driverhub/driverhub") {
                eprintln!("The link could not be opened: {}", e);
            }
        });
        main_vbox.append(&link_button);

        let description_label = Label::new(Some(
            "A driver update manager for Debian/Ubuntu-based systems",
        ));
        description_label.set_halign(gtk::Align::Center);
        description_label.set_wrap(true);
        description_label.set_max_width_chars(50);
        description_label.set_margin_top(8);
        description_label.set_margin_bottom(17);
        main_vbox.append(&description_label);

        let close_button = Button::with_label("OK");
        close_button.set_halign(gtk::Align::Center);
        close_button.set_size_request(100, 35);
        close_button.add_css_class("suggested-action");

        let window_clone = window.clone();
        close_button.connect_clicked(move |_| {
            window_clone.close();
        });
        main_vbox.append(&close_button);

        window.set_child(Some(&main_vbox));
        window
    }
}
