//! Cross-module scenarios: registry, probe, resolver and controller together
