use colored::*;

use crate::terminal::print;

const BANNER: &str = r#"
     _   _      _   ____
    | \ | | ___| |_/ ___|_      _____  ___ _ __
    |  \| |/ _ \ __\___ \ \ /\ / / _ \/ _ \ '_ \
    | |\  |  __/ |_ ___) \ V  V /  __/  __/ |_) |
    |_| \_|\___|\__|____/ \_/\_/ \___|\___| .__/
                                          |_|
"#;

pub fn print() {
    print::print(&format!("{}", BANNER.yellow()));
}
