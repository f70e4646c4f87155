pub mod countdown;
pub mod tick_loop;
