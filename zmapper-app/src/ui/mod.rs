mod controls;
mod grid_dialog;
mod help;
mod hud;
mod menu_bar;
