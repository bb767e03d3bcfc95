mod chunker;
