mod insight_integration;
