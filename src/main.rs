// src/main.rs

use driverhub::about::AboutWindow;
use driverhub::detector;
use driverhub::installer;
use driverhub::model::{ScanError, TaskOutcome};
use driverhub::results_page::ResultsPage;
use driverhub::task_runner::{ProgressNote, TaskCompletion, TaskRunner};
use gtk::gdk::Display;
use gtk::prelude::*;
use gtk::{
    Application, ApplicationWindow, Box as GtkBox, Button, ButtonsType, CssProvider, HeaderBar,
    Label, MessageDialog, MessageType, Orientation, ProgressBar, ScrolledWindow, Stack,
    StackTransitionType, TextBuffer, TextView,
};
use std::rc::Rc;
use std::time::Duration;

const APP_ID: &str = "org.driverhub.Driverhub";

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(
        "
        .header-button {
            padding: 8px 16px;
            margin: 4px;
            border-radius: 8px;
            font-weight: bold;
        }

        .refresh-button {
            background: linear-gradient(135deg, #4CAF50, #45a049);
            color: white;
        }

        .select-button {
            background: linear-gradient(135deg, #2196F3, #1976D2);
            color: white;
        }

        .install-button {
            background: linear-gradient(135deg, #FF9800, #F57C00);
            color: white;
        }

        .scan-button {
            background: linear-gradient(135deg, #2ecc71, #27ae60);
            color: white;
            font-size: 20px;
            font-weight: bold;
            border-radius: 60px;
            padding: 30px 60px;
        }

        .scan-button.scanning {
            background: linear-gradient(135deg, #e67e22, #d35400);
        }

        .banner {
            border-radius: 8px;
            padding: 10px 14px;
            margin: 4px;
            font-weight: bold;
        }

        .banner-ok { background-color: rgba(46, 204, 113, 0.15); color: #27ae60; }
        .banner-info { background-color: rgba(52, 152, 219, 0.15); color: #2980b9; }
        .banner-warn { background-color: rgba(230, 126, 34, 0.15); color: #d35400; }
        .banner-error { background-color: rgba(231, 76, 60, 0.15); color: #c0392b; }

        .package-row {
            padding: 8px;
            border-bottom: 1px solid #e0e0e0;
        }

        .package-row:hover {
            background-color: #f5f5f5;
        }

        .package-name {
            font-weight: bold;
            font-size: 14px;
        }

        .version-info {
            font-family: monospace;
            font-size: 12px;
            color: #666;
        }

        .recommended {
            color: #1a7f37;
            font-size: 12px;
        }

        .log-view {
            font-family: monospace;
            font-size: 12px;
        }
        ",
    );

    gtk::style_context_add_provider_for_display(
        &Display::default().expect("Could not connect to a display."),
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Banner {
    Ready,
    Scanning,
    Installing,
    UpToDate,
    UpdatesFound,
    Error,
    Unavailable,
}

struct ScanPage {
    root: GtkBox,
    banner: GtkBox,
    banner_icon: Label,
    banner_text: Label,
    scan_button: Button,
    progress_bar: ProgressBar,
    log_view: TextView,
    log_buffer: TextBuffer,
}

const BANNER_CLASSES: &[&str] = &["banner-ok", "banner-info", "banner-warn", "banner-error"];

impl ScanPage {
    fn set_banner(&self, banner: Banner) {
        let (icon, class, text) = match banner {
            Banner::Ready => ("🔍", "banner-info", "Ready to scan for driver updates."),
            Banner::Scanning => ("⏳", "banner-info", "Scanning for drivers..."),
            Banner::Installing => ("⬇️", "banner-info", "Installing driver updates..."),
            Banner::UpToDate => ("✔", "banner-ok", "All your drivers are up to date!"),
            Banner::UpdatesFound => ("❗", "banner-warn", "Driver updates found!"),
            Banner::Error => ("✖", "banner-error", "Scan failed. Check the log for details."),
            Banner::Unavailable => (
                "✖",
                "banner-warn",
                "No driver detection tool is available on this system.",
            ),
        };
        for class in BANNER_CLASSES {
            self.banner.remove_css_class(class);
        }
        self.banner.add_css_class(class);
        self.banner_icon.set_text(icon);
        self.banner_text.set_text(text);
    }

    fn append_log(&self, text: &str) {
        let mut end_iter = self.log_buffer.end_iter();
        self.log_buffer.insert(&mut end_iter, &format!("{}\n", text));

        // Auto scroll to the bottom
        let mark = self.log_buffer.create_mark(None, &end_iter, false);
        self.log_view.scroll_mark_onscreen(&mark);
    }

    fn set_working(&self, working: bool) {
        if working {
            self.scan_button.set_label("CANCEL");
            self.scan_button.add_css_class("scanning");
            self.progress_bar.set_fraction(0.0);
            self.progress_bar.set_visible(true);
        } else {
            self.scan_button.set_label("SCAN");
            self.scan_button.remove_css_class("scanning");
            self.progress_bar.set_visible(false);
        }
    }
}

fn build_scan_page() -> Rc<ScanPage> {
    let root = GtkBox::new(Orientation::Vertical, 0);
    root.set_margin_top(16);
    root.set_margin_bottom(16);
    root.set_margin_start(16);
    root.set_margin_end(16);

    let banner = GtkBox::new(Orientation::Horizontal, 12);
    banner.add_css_class("banner");
    let banner_icon = Label::new(None);
    let banner_text = Label::new(None);
    banner_text.set_hexpand(true);
    banner_text.set_halign(gtk::Align::Start);
    banner.append(&banner_icon);
    banner.append(&banner_text);
    root.append(&banner);

    let center = GtkBox::new(Orientation::Vertical, 0);
    center.set_vexpand(true);
    center.set_halign(gtk::Align::Center);
    center.set_valign(gtk::Align::Center);
    let scan_button = Button::with_label("SCAN");
    scan_button.add_css_class("scan-button");
    center.append(&scan_button);
    root.append(&center);

    let progress_bar = ProgressBar::new();
    progress_bar.set_show_text(true);
    progress_bar.set_visible(false);
    progress_bar.set_margin_bottom(8);
    root.append(&progress_bar);

    let log_buffer = TextBuffer::new(None::<&gtk::TextTagTable>);
    let log_view = TextView::with_buffer(&log_buffer);
    log_view.set_editable(false);
    log_view.set_cursor_visible(false);
    log_view.set_monospace(true);
    log_view.add_css_class("log-view");

    let log_scroll = ScrolledWindow::builder()
        .hexpand(true)
        .height_request(150)
        .build();
    log_scroll.set_child(Some(&log_view));
    root.append(&log_scroll);

    let page = Rc::new(ScanPage {
        root,
        banner,
        banner_icon,
        banner_text,
        scan_button,
        progress_bar,
        log_view,
        log_buffer,
    });
    page.set_banner(Banner::Ready);
    page.append_log("System ready. Click SCAN to check for driver updates.");
    page
}

fn show_message(parent: &ApplicationWindow, message_type: MessageType, text: &str) {
    let dialog = MessageDialog::builder()
        .transient_for(parent)
        .modal(true)
        .message_type(message_type)
        .buttons(ButtonsType::Ok)
        .text(text)
        .build();
    dialog.connect_response(|dlg, _| dlg.close());
    dialog.show();
}

fn build_ui(app: &Application) {
    // A second launch only re-presents the hidden window.
    if let Some(window) = app.active_window() {
        window.present();
        return;
    }

    load_css();

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Driverhub")
        .default_width(860)
        .default_height(620)
        .build();

    let header_bar = HeaderBar::new();
    header_bar.set_title_widget(Some(&Label::new(Some("🔧 Driverhub"))));

    let about_button = Button::with_label("About");
    header_bar.pack_start(&about_button);

    let quit_button = Button::with_label("Quit");
    header_bar.pack_end(&quit_button);

    window.set_titlebar(Some(&header_bar));

    let scan_page = build_scan_page();
    let results_page = ResultsPage::new();

    let stack = Stack::new();
    stack.set_transition_type(StackTransitionType::SlideLeftRight);
    stack.add_named(&scan_page.root, Some("scan"));
    stack.add_named(&results_page.root, Some("results"));
    window.set_child(Some(&stack));
    window.present();

    let runner = Rc::new(TaskRunner::new());

    // Scan button doubles as the cancel button while a task runs.
    {
        let runner = Rc::clone(&runner);
        let scan_page_clone = Rc::clone(&scan_page);
        scan_page.scan_button.connect_clicked(move |_| {
            if runner.is_running() {
                if runner.cancel().is_ok() {
                    scan_page_clone.set_working(false);
                    scan_page_clone.set_banner(Banner::Ready);
                    scan_page_clone.append_log("Cancellation requested.");
                }
            } else {
                let started = runner.start(|cancel, progress| {
                    Ok(TaskOutcome::Scan(detector::scan(cancel, progress)))
                });
                match started {
                    Ok(()) => {
                        scan_page_clone.set_working(true);
                        scan_page_clone.set_banner(Banner::Scanning);
                        scan_page_clone.append_log("Scan started.");
                    }
                    Err(err) => scan_page_clone.append_log(&err.to_string()),
                }
            }
        });
    }

    {
        let stack = stack.clone();
        let scan_page_clone = Rc::clone(&scan_page);
        results_page.back_button.connect_clicked(move |_| {
            scan_page_clone.set_banner(Banner::Ready);
            stack.set_visible_child_name("scan");
        });
    }

    // Shared launcher for "Update Selected" and "Update All".
    let start_install: Rc<dyn Fn(Vec<String>)> = {
        let runner = Rc::clone(&runner);
        let scan_page_clone = Rc::clone(&scan_page);
        let stack = stack.clone();
        let window = window.clone();
        Rc::new(move |packages: Vec<String>| {
            if packages.is_empty() {
                show_message(
                    &window,
                    MessageType::Error,
                    "⚠️ Please select at least one package.",
                );
                return;
            }
            let package_list = packages.join(" ");
            let started = runner.start(move |cancel, progress| {
                Ok(TaskOutcome::Install(installer::install(
                    &packages, cancel, progress,
                )))
            });
            match started {
                Ok(()) => {
                    stack.set_visible_child_name("scan");
                    scan_page_clone.set_working(true);
                    scan_page_clone.set_banner(Banner::Installing);
                    scan_page_clone.append_log(&format!("Starting update for: {}", package_list));
                }
                Err(err) => show_message(&window, MessageType::Error, &err.to_string()),
            }
        })
    };

    {
        let start_install = Rc::clone(&start_install);
        let results_page_clone = Rc::clone(&results_page);
        results_page.update_selected_button.connect_clicked(move |_| {
            start_install(results_page_clone.selected_packages());
        });
    }

    {
        let start_install = Rc::clone(&start_install);
        let results_page_clone = Rc::clone(&results_page);
        results_page.update_all_button.connect_clicked(move |_| {
            start_install(results_page_clone.all_packages());
        });
    }

    {
        let window = window.clone();
        about_button.connect_clicked(move |_| {
            AboutWindow::new(&window).present();
        });
    }

    {
        let app = app.clone();
        quit_button.connect_clicked(move |_| {
            app.quit();
        });
    }

    let quit_action = gio::SimpleAction::new("quit", None);
    {
        let app = app.clone();
        quit_action.connect_activate(move |_, _| app.quit());
    }
    app.add_action(&quit_action);
    app.set_accels_for_action("app.quit", &["<Primary>q"]);

    // Closing the window hides it; the hold keeps the application alive in
    // the background until the quit action runs.
    {
        let hold_guard = app.hold();
        window.connect_close_request(move |window| {
            let _ = &hold_guard;
            window.set_visible(false);
            glib::Propagation::Stop
        });
    }

    // Marshal worker results back onto the UI thread.
    {
        let runner = Rc::clone(&runner);
        let scan_page = Rc::clone(&scan_page);
        let results_page = Rc::clone(&results_page);
        let stack = stack.clone();
        let window = window.clone();
        glib::timeout_add_local(Duration::from_millis(100), move || {
            for note in runner.drain_progress() {
                match note {
                    ProgressNote::Status(status) => {
                        if runner.is_running() {
                            scan_page.banner_text.set_text(&status);
                        }
                    }
                    ProgressNote::Fraction(fraction) => {
                        scan_page.progress_bar.set_fraction(fraction);
                        scan_page
                            .progress_bar
                            .set_text(Some(&format!("{}%", (fraction * 100.0) as i32)));
                    }
                    ProgressNote::Log(line) => scan_page.append_log(&line),
                }
            }

            let Some(completion) = runner.take_completion() else {
                return glib::ControlFlow::Continue;
            };
            scan_page.set_working(false);

            match completion {
                TaskCompletion::Completed(TaskOutcome::Scan(result)) => {
                    if let Some(error) = &result.error {
                        match error {
                            ScanError::DetectionUnavailable => {
                                scan_page.set_banner(Banner::Unavailable);
                                scan_page.append_log(
                                    "Install ubuntu-drivers-common or apt to enable scanning.",
                                );
                            }
                            ScanError::CommandFailed(message) => {
                                scan_page.set_banner(Banner::Error);
                                scan_page.append_log(message);
                                show_message(
                                    &window,
                                    MessageType::Error,
                                    &format!("Error while scanning:\n{}", message),
                                );
                            }
                        }
                    } else if result.entries.is_empty() {
                        scan_page.set_banner(Banner::UpToDate);
                        scan_page.append_log("No driver updates found.");
                    } else {
                        scan_page.set_banner(Banner::UpdatesFound);
                        scan_page
                            .append_log(&format!("{} driver update(s) found.", result.entries.len()));
                        results_page.populate(&result.entries);
                        stack.set_visible_child_name("results");
                    }
                }
                TaskCompletion::Completed(TaskOutcome::Install(outcomes)) => {
                    let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
                    let failed: Vec<String> = outcomes
                        .iter()
                        .filter(|o| !o.succeeded)
                        .map(|o| {
                            format!(
                                "{}: {}",
                                o.package_name,
                                o.error_message.as_deref().unwrap_or("failed")
                            )
                        })
                        .collect();
                    let reboot_required = outcomes.iter().any(|o| o.reboot_required);

                    for outcome in &outcomes {
                        if outcome.succeeded {
                            scan_page.append_log(&format!("✅ {} updated.", outcome.package_name));
                        } else {
                            scan_page.append_log(&format!(
                                "❌ {} failed: {}",
                                outcome.package_name,
                                outcome.error_message.as_deref().unwrap_or("unknown error")
                            ));
                        }
                    }

                    scan_page.set_banner(Banner::Ready);
                    if failed.is_empty() {
                        show_message(
                            &window,
                            MessageType::Info,
                            &format!("✅ {} update(s) installed successfully.", succeeded),
                        );
                    } else {
                        show_message(
                            &window,
                            MessageType::Error,
                            &format!(
                                "{} update(s) installed, {} failed:\n{}",
                                succeeded,
                                failed.len(),
                                failed.join("\n")
                            ),
                        );
                    }
                    if reboot_required {
                        show_message(
                            &window,
                            MessageType::Info,
                            "🔄 A kernel or firmware package was updated.\nRestart the computer to finish applying it.",
                        );
                    }
                }
                TaskCompletion::Failed(message) => {
                    scan_page.set_banner(Banner::Error);
                    scan_page.append_log(&message);
                    show_message(
                        &window,
                        MessageType::Error,
                        &format!("The operation failed:\n{}", message),
                    );
                }
            }

            glib::ControlFlow::Continue
        });
    }
}

fn main() -> glib::ExitCode {
    let app = Application::builder().application_id(APP_ID).build();
    app.connect_activate(build_ui);
    app.run()
}
