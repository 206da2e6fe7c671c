pub mod keyboard_nav;
