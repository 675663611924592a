use std::io::IsTerminal;

use clap::{ValueEnum, builder::styling::Ansi256Color};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of console output means, independent of the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
  Timestamp,
  Primary,
  Accent,
  Info,
  Success,
  Label,
  Value,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
  Color::Rgb { r, g, b }
}

const fn palette(theme: Theme, role: Role) -> Color {
  match (theme, role) {
    (Theme::Dark, Role::Timestamp | Role::Info | Role::Success) => rgb(96, 165, 178),
    (Theme::Dark, Role::Primary) => rgb(205, 214, 222),
    (Theme::Dark, Role::Accent) => rgb(229, 108, 84),
    (Theme::Dark, Role::Label) => rgb(122, 162, 247),
    (Theme::Dark, Role::Value) => rgb(158, 206, 106),
    (Theme::Light, Role::Timestamp) => rgb(88, 96, 105),
    (Theme::Light, Role::Primary) => rgb(36, 41, 47),
    (Theme::Light, Role::Accent) => rgb(191, 56, 42),
    (Theme::Light, Role::Info) => rgb(9, 105, 218),
    (Theme::Light, Role::Success) => rgb(26, 127, 55),
    (Theme::Light, Role::Label) => rgb(64, 81, 181),
    (Theme::Light, Role::Value) => rgb(130, 80, 223),
  }
}

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

pub trait IntoComfyColor {
  fn into(self) -> ComfyColor;
}

impl IntoComfyColor for Color {
  fn into(self) -> ComfyColor {
    match self {
      Color::Reset => ComfyColor::Reset,
      Color::Black => ComfyColor::Black,
      Color::DarkGrey => ComfyColor::DarkGrey,
      Color::Red => ComfyColor::Red,
      Color::DarkRed => ComfyColor::DarkRed,
      Color::Green => ComfyColor::Green,
      Color::DarkGreen => ComfyColor::DarkGreen,
      Color::Yellow => ComfyColor::Yellow,
      Color::DarkYellow => ComfyColor::DarkYellow,
      Color::Blue => ComfyColor::Blue,
      Color::DarkBlue => ComfyColor::DarkBlue,
      Color::Magenta => ComfyColor::Magenta,
      Color::DarkMagenta => ComfyColor::DarkMagenta,
      Color::Cyan => ComfyColor::Cyan,
      Color::DarkCyan => ComfyColor::DarkCyan,
      Color::White => ComfyColor::White,
      Color::Grey => ComfyColor::Grey,
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      Color::AnsiValue(val) => ComfyColor::AnsiValue(val),
    }
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn pick(&self, role: Role) -> Color {
    if self.enabled {
      palette(self.theme, role)
    } else {
      Color::Reset
    }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick(Role::Timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.pick(Role::Primary)
  }

  pub const fn accent(&self) -> Color {
    self.pick(Role::Accent)
  }

  pub const fn info(&self) -> Color {
    self.pick(Role::Info)
  }

  pub const fn success(&self) -> Color {
    self.pick(Role::Success)
  }

  pub const fn label(&self) -> Color {
    self.pick(Role::Label)
  }

  pub const fn value(&self) -> Color {
    self.pick(Role::Value)
  }

  const fn to_clap(color: Color) -> Option<clap::builder::styling::Color> {
    use clap::builder::styling::{AnsiColor, Color as ClapColor, RgbColor};

    match color {
      Color::Black => Some(ClapColor::Ansi(AnsiColor::Black)),
      Color::Blue | Color::DarkBlue => Some(ClapColor::Ansi(AnsiColor::Blue)),
      Color::Cyan | Color::DarkCyan => Some(ClapColor::Ansi(AnsiColor::Cyan)),
      Color::DarkGreen | Color::Green => Some(ClapColor::Ansi(AnsiColor::Green)),
      Color::DarkGrey | Color::Grey => Some(ClapColor::Ansi(AnsiColor::BrightBlack)),
      Color::DarkMagenta | Color::Magenta => Some(ClapColor::Ansi(AnsiColor::Magenta)),
      Color::DarkRed | Color::Red => Some(ClapColor::Ansi(AnsiColor::Red)),
      Color::DarkYellow | Color::Yellow => Some(ClapColor::Ansi(AnsiColor::Yellow)),
      Color::White => Some(ClapColor::Ansi(AnsiColor::White)),
      Color::AnsiValue(val) => Some(ClapColor::Ansi256(Ansi256Color(val))),
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      Color::Reset => None,
    }
  }

  /// Help output styling, always in the dark palette.
  pub const fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{Style, Styles};

    let colors = Self::new(true, Theme::Dark);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(colors.label())))
      .usage(Style::new().bold().fg_color(Self::to_clap(colors.label())))
      .literal(Style::new().fg_color(Self::to_clap(colors.value())))
      .placeholder(Style::new().fg_color(Self::to_clap(colors.info())))
      .error(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
      .valid(Style::new().fg_color(Self::to_clap(colors.success())))
      .invalid(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => std::env::var("COLORFGBG")
      .ok()
      .and_then(|value| theme_from_colorfgbg(&value))
      .unwrap_or(Theme::Dark),
  }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); background indices 8 and up are light.
fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
  let background = value.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if background >= 8 { Theme::Light } else { Theme::Dark })
}
