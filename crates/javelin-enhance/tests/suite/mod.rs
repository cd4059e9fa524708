mod fixtures;
mod inheritance;
mod lookup;
mod qualifiers;
